//! Mediabox Storage Library
//!
//! Storage abstraction plus the S3 and local filesystem backends.
//!
//! # Storage key format
//!
//! `{base_path}/{dir}/{uuid}-{filename}`, where `base_path` is the deployment
//! environment and `dir` groups objects by purpose (`others` by default).
//! Keys never contain `..` or a leading `/`. Key generation lives in the
//! `keys` module so every caller produces the same layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{generate_storage_key, sanitize_filename, DEFAULT_DIR};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use mediabox_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
