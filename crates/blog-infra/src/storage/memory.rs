//! In-memory file storage - used when no storage root is writable, and in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use blog_core::domain::UploadedFile;
use blog_core::error::StorageError;
use blog_core::ports::FileStorage;

use super::generated_path;

/// Stored files kept in a map keyed by path.
#[derive(Default)]
pub struct InMemoryFileStorage {
    files: RwLock<BTreeMap<String, Bytes>>,
}

impl InMemoryFileStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a file at an exact path.
    pub async fn put(&self, path: &str, data: Bytes) {
        self.files.write().await.insert(path.to_string(), data);
    }

    /// Paths of every stored file, sorted.
    pub async fn paths(&self) -> Vec<String> {
        self.files.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl FileStorage for InMemoryFileStorage {
    async fn store(&self, directory: &str, file: &UploadedFile) -> Result<String, StorageError> {
        if file.data.is_empty() {
            return Err(StorageError::EmptyPayload);
        }

        let path = generated_path(directory, file);
        self.files
            .write()
            .await
            .insert(path.clone(), file.data.clone());
        Ok(path)
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.files.write().await.remove(path);
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        Ok(self.files.read().await.contains_key(path))
    }
}
