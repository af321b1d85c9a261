use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{SessionSnapshot, SessionStore, StorageError};

use super::SqliteRepository;

/// Keys for the two persisted session entries. Written together on save,
/// deleted together on clear.
const CURRENT_KEY: &str = "session.current";
const SELECTIONS_KEY: &str = "session.selections";

impl SqliteRepository {
    async fn get_entry(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_entries WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        row.try_get("value")
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }
}

#[async_trait]
impl SessionStore for SqliteRepository {
    async fn load(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        let current = self.get_entry(CURRENT_KEY).await?;
        let selections = self.get_entry(SELECTIONS_KEY).await?;

        // Both entries are written together; treat a lone survivor as absent
        // rather than guessing at half a session.
        let (Some(current), Some(selections)) = (current, selections) else {
            return Ok(None);
        };

        let current: usize = current.parse().map_err(|_| {
            StorageError::Serialization(format!("invalid current index entry: {current:?}"))
        })?;
        let selections: Vec<Vec<u8>> = serde_json::from_str(&selections)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        Ok(Some(SessionSnapshot {
            current,
            selections,
        }))
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let selections = serde_json::to_string(&snapshot.selections)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let updated_at = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        for (key, value) in [
            (CURRENT_KEY, snapshot.current.to_string()),
            (SELECTIONS_KEY, selections),
        ] {
            sqlx::query(
                r"
                INSERT INTO kv_entries (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                ",
            )
            .bind(key)
            .bind(value)
            .bind(updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_entries WHERE key IN (?1, ?2)")
            .bind(CURRENT_KEY)
            .bind(SELECTIONS_KEY)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
