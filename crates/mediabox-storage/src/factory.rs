#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use mediabox_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::Config("S3_BUCKET not configured".to_string()))?;
            let region = config
                .s3_effective_region()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::Config("S3_REGION or AWS_REGION not configured".to_string())
                })?;

            let storage = S3Storage::new(
                bucket,
                region,
                config.s3_endpoint.clone(),
                config.s3_public_url.clone(),
            )
            .await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::Config(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::Config("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::Config("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::Config(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use mediabox_core::config::LogFormat;

    fn local_config(path: &str) -> Config {
        Config {
            server_port: 4000,
            environment: "test".to_string(),
            cors_origins: vec!["*".to_string()],
            log_format: LogFormat::Compact,
            database_url: "postgres://localhost/mediabox".to_string(),
            db_max_connections: 1,
            db_timeout_seconds: 5,
            api_key: "k".repeat(32),
            storage_backend: StorageBackend::Local,
            storage_base_path: "test".to_string(),
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            s3_public_url: None,
            aws_region: None,
            local_storage_path: Some(path.to_string()),
            local_storage_base_url: Some("http://localhost:4000/files".to_string()),
            max_file_size_bytes: 1024,
            max_files_per_request: 2,
        }
    }

    #[tokio::test]
    async fn creates_local_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = local_config(dir.path().to_str().unwrap());

        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }

    #[tokio::test]
    async fn local_backend_without_path_is_config_error() {
        let mut config = local_config("/unused");
        config.local_storage_path = None;

        let result = create_storage(&config).await;
        assert!(matches!(result, Err(StorageError::Config(_))));
    }

    #[cfg(feature = "storage-s3")]
    #[tokio::test]
    async fn s3_backend_without_bucket_is_config_error() {
        let mut config = local_config("/unused");
        config.storage_backend = StorageBackend::S3;
        config.aws_region = Some("eu-west-1".to_string());

        let result = create_storage(&config).await;
        assert!(matches!(result, Err(StorageError::Config(_))));
    }
}
