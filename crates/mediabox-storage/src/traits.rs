//! The `Storage` trait every backend implements, and its error type.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Failures reported by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    /// The key is empty or would escape the storage root
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("upload failed: {0}")]
    UploadFailed(String),

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("delete failed: {0}")]
    DeleteFailed(String),

    /// Any other error returned by the backend
    #[error("storage backend: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Backend cannot be built from the given settings
    #[error("storage configuration: {0}")]
    Config(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Object storage backend
///
/// Callers choose the key (see `keys::generate_storage_key`); backends only
/// move bytes and report where the object can be fetched from.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `storage_key` and return the object's public URL.
    ///
    /// Writing to an existing key replaces the object.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Delete an object. Deleting a key that does not exist succeeds.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Download an object by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Public URL an object under `storage_key` is (or would be) served from
    fn public_url(&self, storage_key: &str) -> String;

    fn backend_type(&self) -> StorageBackend;
}
