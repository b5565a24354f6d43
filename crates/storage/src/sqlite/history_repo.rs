use async_trait::async_trait;
use chrono::Utc;
use quiz_core::model::QuizResult;
use sqlx::Row;

use super::SqliteRepository;
use crate::record::{decode_history, encode_history};
use crate::repository::{HISTORY_KEY, HistoryRepository, StorageError};

#[async_trait]
impl HistoryRepository for SqliteRepository {
    async fn load_history(&self) -> Result<Vec<QuizResult>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(HISTORY_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(Vec::new());
        };

        let raw: String = row
            .try_get("value")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        decode_history(&raw)
    }

    async fn save_history(&self, history: &[QuizResult]) -> Result<(), StorageError> {
        let raw = encode_history(history)?;

        sqlx::query(
            r"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(HISTORY_KEY)
        .bind(raw)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn clear_history(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(HISTORY_KEY)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
