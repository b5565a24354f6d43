use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use quiz_core::model::QuizResult;
use storage::repository::{HistoryRepository, InMemoryRepository, StorageError};

use crate::error::HistoryError;

/// A change to the stored history, ordered by its revision.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryChange {
    Replace(Vec<QuizResult>),
    Clear,
}

/// Loads and stores the persisted result history.
///
/// Clones share one write queue: `commit` runs changes one at a time and
/// drops any change older than the last one stored.
#[derive(Clone)]
pub struct HistoryService {
    repo: Arc<dyn HistoryRepository>,
    revisions: Arc<AtomicU64>,
    committed: Arc<Mutex<u64>>,
}

impl HistoryService {
    #[must_use]
    pub fn new(repo: Arc<dyn HistoryRepository>) -> Self {
        Self {
            repo,
            revisions: Arc::new(AtomicU64::new(0)),
            committed: Arc::new(Mutex::new(0)),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }

    /// Load the stored history, oldest first.
    ///
    /// An unreadable document is logged and treated as an empty history.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` if the backend itself cannot be reached.
    pub async fn load(&self) -> Result<Vec<QuizResult>, HistoryError> {
        match self.repo.load_history().await {
            Ok(history) => Ok(history),
            Err(StorageError::Serialization(reason)) => {
                warn!(%reason, "stored quiz history is unreadable, starting empty");
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Replace the stored history with `history`.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` if the write fails.
    pub async fn save(&self, history: &[QuizResult]) -> Result<(), HistoryError> {
        self.repo.save_history(history).await?;
        Ok(())
    }

    /// Remove the stored history.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` if the delete fails.
    pub async fn clear(&self) -> Result<(), HistoryError> {
        self.repo.clear_history().await?;
        info!("quiz history cleared");
        Ok(())
    }

    /// Reserve the revision for the next change.
    #[must_use]
    pub fn next_revision(&self) -> u64 {
        self.revisions.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store `change` unless a later revision is already stored.
    ///
    /// Returns `false` when the change was superseded and skipped.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` if the write fails. The revision is not
    /// recorded in that case.
    pub async fn commit(
        &self,
        revision: u64,
        change: &HistoryChange,
    ) -> Result<bool, HistoryError> {
        let mut committed = self.committed.lock().await;
        if revision <= *committed {
            debug!(revision, committed = *committed, "skipping superseded history change");
            return Ok(false);
        }
        match change {
            HistoryChange::Replace(history) => self.save(history).await?,
            HistoryChange::Clear => self.clear().await?,
        }
        *committed = revision;
        Ok(true)
    }
}
