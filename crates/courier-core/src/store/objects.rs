//! Binary object storage seam for file upload and download.

use async_trait::async_trait;
use dashmap::DashMap;

use super::StoreError;

/// Flat key-to-bytes object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores an object, replacing any existing object under the key.
    async fn put_object(&self, key: &str, data: Vec<u8>) -> Result<(), StoreError>;

    /// Fetches an object's bytes. `None` if the key does not exist.
    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
}

/// In-memory [`ObjectStore`].
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: DashMap<String, Vec<u8>>,
}

impl MemoryObjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(&self, key: &str, data: Vec<u8>) -> Result<(), StoreError> {
        self.objects.insert(key.to_string(), data);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.objects.get(key).map(|o| o.clone()))
    }
}
