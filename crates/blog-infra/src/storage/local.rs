//! Filesystem-backed storage rooted at a configured directory.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};

use blog_core::domain::UploadedFile;
use blog_core::error::StorageError;
use blog_core::ports::FileStorage;

use super::generated_path;

#[derive(Debug)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Initialise storage rooted at the provided directory, creating it if necessary.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a stored path below the root, refusing anything that escapes it.
    fn resolve(&self, stored_path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(stored_path);
        if stored_path.is_empty()
            || relative.is_absolute()
            || relative.components().any(|component| {
                matches!(
                    component,
                    Component::ParentDir | Component::Prefix(_) | Component::RootDir
                )
            })
        {
            return Err(StorageError::InvalidPath(stored_path.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, directory: &str, file: &UploadedFile) -> Result<String, StorageError> {
        if file.data.is_empty() {
            return Err(StorageError::EmptyPayload);
        }

        let stored_path = generated_path(directory, file);
        let absolute = self.resolve(&stored_path)?;

        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut handle = fs::File::create(&absolute).await?;
        if let Err(err) = handle.write_all(&file.data).await {
            drop(handle);
            let _ = fs::remove_file(&absolute).await;
            return Err(err.into());
        }
        handle.flush().await?;

        tracing::debug!(path = %stored_path, bytes = file.size(), "Stored upload");
        Ok(stored_path)
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let absolute = self.resolve(path)?;
        match fs::remove_file(&absolute).await {
            Ok(()) => {
                tracing::debug!(path = %path, "Deleted stored file");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::Io(err)),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let absolute = self.resolve(path)?;
        Ok(fs::try_exists(&absolute).await?)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use tempfile::TempDir;

    use super::*;

    fn jpeg() -> UploadedFile {
        UploadedFile::new("valid.jpg", Bytes::from_static(&[0xFF, 0xD8, 0xFF, 0xE0]))
    }

    #[tokio::test]
    async fn test_store_and_delete() {
        let dir = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(dir.path()).unwrap();

        let path = storage.store("images/posts", &jpeg()).await.unwrap();
        assert!(path.starts_with("images/posts/"));
        assert!(storage.exists(&path).await.unwrap());
        assert_eq!(
            std::fs::read(dir.path().join(&path)).unwrap(),
            vec![0xFF, 0xD8, 0xFF, 0xE0]
        );

        storage.delete(&path).await.unwrap();
        assert!(!storage.exists(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_ok() {
        let dir = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(dir.path()).unwrap();

        storage.delete("images/posts/missing.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_paths_outside_root() {
        let dir = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(dir.path()).unwrap();

        assert!(matches!(
            storage.delete("../etc/passwd").await,
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            storage.exists("/etc/passwd").await,
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_upload_is_rejected() {
        let dir = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(dir.path()).unwrap();
        let empty = UploadedFile::new("empty.jpg", Bytes::new());

        assert!(matches!(
            storage.store("images/posts", &empty).await,
            Err(StorageError::EmptyPayload)
        ));
    }
}
