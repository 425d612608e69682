//! Filesystem backend, for development and tests.
//!
//! Objects live at `{root}/{key}` and are expected to be served by something
//! in front of the service under `base_url`.

use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;

#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create the root directory if needed.
    ///
    /// # Arguments
    /// * `root` - Directory objects are written under (e.g. "/var/lib/mediabox")
    /// * `base_url` - URL the directory is served from (e.g. "http://localhost:4000/files")
    pub async fn new(root: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::Config(format!("Cannot create {}: {}", root.display(), e))
        })?;

        Ok(Self {
            root,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a key under the root. Absolute keys and `..` segments are refused.
    fn resolve(&self, storage_key: &str) -> StorageResult<PathBuf> {
        let escapes = storage_key.is_empty()
            || Path::new(storage_key).has_root()
            || storage_key.starts_with(['/', '\\'])
            || storage_key.split(['/', '\\']).any(|segment| segment == "..");

        if escapes {
            return Err(StorageError::InvalidKey(storage_key.to_string()));
        }
        Ok(self.root.join(storage_key))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    #[tracing::instrument(skip(self, data), fields(key = %storage_key, size_bytes = data.len()))]
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.resolve(storage_key)?;
        let start = Instant::now();

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }
        fs::write(&path, &data).await.map_err(|e| {
            StorageError::UploadFailed(format!("{}: {}", path.display(), e))
        })?;

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );
        Ok(self.public_url(storage_key))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.resolve(storage_key)?;

        match fs::remove_file(&path).await {
            Ok(()) => tracing::info!(key = %storage_key, "Local storage delete successful"),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(key = %storage_key, "Local storage delete of missing file")
            }
            Err(e) => {
                return Err(StorageError::DeleteFailed(format!("{}: {}", path.display(), e)))
            }
        }
        Ok(())
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let path = self.resolve(storage_key)?;

        fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(storage_key.to_string()),
            _ => StorageError::DownloadFailed(format!("{}: {}", path.display(), e)),
        })
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.resolve(storage_key)?;
        Ok(fs::try_exists(&path).await?)
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url, storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir, "http://localhost:4000/files/".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_then_download() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let url = storage
            .upload_with_key("test/others/abc-note.txt", Bytes::from_static(b"hello"), "text/plain")
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:4000/files/test/others/abc-note.txt");
        let downloaded = storage.download("test/others/abc-note.txt").await.unwrap();
        assert_eq!(downloaded, b"hello");
    }

    #[tokio::test]
    async fn test_upload_replaces_existing_object() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        storage
            .upload_with_key("k/file.bin", Bytes::from_static(b"first"), "application/octet-stream")
            .await
            .unwrap();
        storage
            .upload_with_key("k/file.bin", Bytes::from_static(b"second"), "application/octet-stream")
            .await
            .unwrap();

        assert_eq!(storage.download("k/file.bin").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage.download("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("a/../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_object_succeeds() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        assert!(storage.delete("nonexistent/file.txt").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_object() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        storage
            .upload_with_key("gone.txt", Bytes::from_static(b"x"), "text/plain")
            .await
            .unwrap();
        assert!(storage.exists("gone.txt").await.unwrap());

        storage.delete("gone.txt").await.unwrap();
        assert!(!storage.exists("gone.txt").await.unwrap());
        assert!(matches!(
            storage.download("gone.txt").await,
            Err(StorageError::NotFound(_))
        ));
    }
}
