use async_trait::async_trait;
use quiz_core::model::QuizResult;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::record::{decode_history, encode_history};

/// Fixed key the history document is stored under.
pub const HISTORY_KEY: &str = "multiplication_quiz_history";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the persisted quiz history.
///
/// The history is always read and written as a whole, in chronological order.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Load the full history. A missing document is an empty history.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored document cannot be
    /// parsed, or other storage errors.
    async fn load_history(&self) -> Result<Vec<QuizResult>, StorageError>;

    /// Replace the stored history with `history`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be stored.
    async fn save_history(&self, history: &[QuizResult]) -> Result<(), StorageError>;

    /// Remove the stored history document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be removed.
    async fn clear_history(&self) -> Result<(), StorageError>;
}

/// In-memory repository for tests and prototyping.
///
/// Stores the encoded JSON document rather than domain values so it exercises
/// the same encode/decode path as the `SQLite` backend.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    document: Arc<Mutex<Option<String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            document: Arc::new(Mutex::new(None)),
        }
    }

    /// Seed the repository with a raw document, e.g. a corrupted one.
    #[must_use]
    pub fn with_raw_document(raw: impl Into<String>) -> Self {
        Self {
            document: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    /// The stored document, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw_document(&self) -> Result<Option<String>, StorageError> {
        let guard = self
            .document
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl HistoryRepository for InMemoryRepository {
    async fn load_history(&self) -> Result<Vec<QuizResult>, StorageError> {
        match self.raw_document()? {
            Some(raw) => decode_history(&raw),
            None => Ok(Vec::new()),
        }
    }

    async fn save_history(&self, history: &[QuizResult]) -> Result<(), StorageError> {
        let raw = encode_history(history)?;
        let mut guard = self
            .document
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(raw);
        Ok(())
    }

    async fn clear_history(&self) -> Result<(), StorageError> {
        let mut guard = self
            .document
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Repository handles behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub history: Arc<dyn HistoryRepository>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{FactorPair, QuestionRecord, QuizConfigDraft};
    use quiz_core::time::fixed_now;

    fn build_result(answer: i64) -> QuizResult {
        let config = QuizConfigDraft {
            selected_numbers: vec![5],
            ..QuizConfigDraft::default()
        }
        .validate()
        .unwrap();
        let questions = vec![QuestionRecord::answered(
            FactorPair::new(5, 5).unwrap(),
            answer,
            2_500,
        )];
        QuizResult::from_records(config, questions, fixed_now()).unwrap()
    }

    #[tokio::test]
    async fn empty_repository_loads_empty_history() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let repo = InMemoryRepository::new();
        let history = vec![build_result(25), build_result(20)];

        repo.save_history(&history).await.unwrap();

        assert_eq!(repo.load_history().await.unwrap(), history);
    }

    #[tokio::test]
    async fn clear_removes_document() {
        let repo = InMemoryRepository::new();
        repo.save_history(&[build_result(25)]).await.unwrap();

        repo.clear_history().await.unwrap();

        assert!(repo.raw_document().unwrap().is_none());
        assert!(repo.load_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupted_document_surfaces_serialization_error() {
        let repo = InMemoryRepository::with_raw_document("[{\"id\":");
        let err = repo.load_history().await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
