use async_trait::async_trait;

use crate::domain::UploadedFile;
use crate::error::StorageError;

/// Storage area for post thumbnails.
pub const POST_IMAGES_DIR: &str = "images/posts";

/// File storage - abstraction over where uploaded files live (local disk, in-memory).
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store the file under `directory` with a generated name and return its path.
    async fn store(&self, directory: &str, file: &UploadedFile) -> Result<String, StorageError>;

    /// Remove a stored file. Missing files are treated as success.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    async fn exists(&self, path: &str) -> Result<bool, StorageError>;
}
