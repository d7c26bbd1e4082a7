use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{ObjectMeta, RecordStore, StoreError};

/// In-process [`RecordStore`] for tests and dry runs
///
/// Contents are lost when the store is dropped.
#[derive(Default)]
pub struct InMemoryRecordStore {
    objects: RwLock<BTreeMap<String, (Vec<u8>, DateTime<Utc>)>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        let mut objects = self.objects.write().await;
        if objects.contains_key(key) {
            return Err(StoreError::Conflict(key.to_string()));
        }
        objects.insert(key.to_string(), (body, Utc::now()));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.objects.read().await.get(key).map(|(body, _)| body.clone()))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StoreError> {
        let objects = self.objects.read().await;
        Ok(objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, (_, last_modified))| ObjectMeta {
                key: key.clone(),
                last_modified: *last_modified,
            })
            .collect())
    }
}
