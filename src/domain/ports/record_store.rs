use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error type for record store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store backend failed: {0}")]
    Backend(String),

    #[error("Object already exists: {0}")]
    Conflict(String),

    #[error("Stored object is malformed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Listing entry for a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub key: String,
    pub last_modified: DateTime<Utc>,
}

/// Durable, append-only object storage for standup records
///
/// Any object or key-value store satisfying this contract is acceptable.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store an object under `key`
    ///
    /// # Returns
    /// * `Ok(())` once the object is durable
    /// * `Err(StoreError::Conflict)` if the key is already taken
    /// * `Err(StoreError)` on backend failure
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError>;

    /// Fetch an object
    ///
    /// # Returns
    /// * `Ok(Some(bytes))` if found
    /// * `Ok(None)` if not found
    /// * `Err(StoreError)` on backend failure
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// List objects whose key starts with `prefix`, ordered by key
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StoreError>;
}
