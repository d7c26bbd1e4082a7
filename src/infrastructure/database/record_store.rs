use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::domain::ports::{ObjectMeta, RecordStore, StoreError};

/// `SQLite` implementation of [`RecordStore`]
///
/// Objects live in a single `standup_objects` table keyed by object key.
/// Writes are inserts only; an existing key is a conflict.
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn backend(context: &str, err: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("{context}: {err}"))
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        let last_modified = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r"
            INSERT INTO standup_objects (key, body, last_modified)
            VALUES (?, ?, ?)
            ",
        )
        .bind(key)
        .bind(body)
        .bind(last_modified)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                debug!(key, "object stored");
                Ok(())
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Conflict(key.to_string()))
            }
            Err(e) => Err(backend("failed to insert object", e)),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let row = sqlx::query("SELECT body FROM standup_objects WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| backend("failed to fetch object", e))?;

        row.map(|r| r.try_get::<Vec<u8>, _>("body"))
            .transpose()
            .map_err(|e| backend("failed to decode object body", e))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StoreError> {
        let rows = sqlx::query(
            r"
            SELECT key, last_modified
            FROM standup_objects
            WHERE substr(key, 1, length(?)) = ?
            ORDER BY key
            ",
        )
        .bind(prefix)
        .bind(prefix)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| backend("failed to list objects", e))?;

        rows.into_iter()
            .map(|row| {
                let key: String = row
                    .try_get("key")
                    .map_err(|e| backend("failed to decode key", e))?;
                let raw: String = row
                    .try_get("last_modified")
                    .map_err(|e| backend("failed to decode last_modified", e))?;
                let last_modified = DateTime::parse_from_rfc3339(&raw)
                    .map_err(|e| StoreError::Serialization(format!("{key}: {e}")))?
                    .with_timezone(&Utc);
                Ok(ObjectMeta { key, last_modified })
            })
            .collect()
    }
}
