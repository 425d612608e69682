//! S3 (and S3-compatible) backend built on `object_store`.

use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::{
    Attribute, Attributes, Error as ObjectStoreError, ObjectStore, ObjectStoreExt, PutOptions,
    PutPayload,
};
use std::time::Instant;

#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    /// Objects are served from `{url_base}/{key}`
    url_base: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// Credentials come from the usual `AWS_*` environment variables.
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Custom endpoint for MinIO, Spaces and similar providers
    /// * `public_url` - Prefix object URLs are built from instead of the bucket URL (e.g. a CDN)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.as_str())
            .with_bucket_name(bucket.as_str());

        if let Some(endpoint) = endpoint_url.as_deref() {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::Config(e.to_string()))?;

        let url_base = url_base(
            &bucket,
            &region,
            endpoint_url.as_deref(),
            public_url.as_deref(),
        );

        tracing::debug!(bucket = %bucket, url_base = %url_base, "S3 storage configured");

        Ok(S3Storage {
            store,
            bucket,
            url_base,
        })
    }
}

/// Where objects of a bucket are publicly reachable, without a trailing `/`.
///
/// An explicit public URL wins, then path-style `{endpoint}/{bucket}` for
/// S3-compatible providers, then the virtual-hosted AWS URL.
fn url_base(
    bucket: &str,
    region: &str,
    endpoint: Option<&str>,
    public_url: Option<&str>,
) -> String {
    match (public_url, endpoint) {
        (Some(prefix), _) => prefix.trim_end_matches('/').to_string(),
        (None, Some(endpoint)) => format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
        (None, None) => format!("https://{}.s3.{}.amazonaws.com", bucket, region),
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[async_trait]
impl Storage for S3Storage {
    #[tracing::instrument(
        skip(self, data),
        fields(bucket = %self.bucket, key = %storage_key, size_bytes = data.len())
    )]
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        let start = Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&Path::from(storage_key), PutPayload::from(data), opts)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, duration_ms = elapsed_ms(start), "S3 upload failed");
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(duration_ms = elapsed_ms(start), "S3 upload successful");
        Ok(self.public_url(storage_key))
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket, key = %storage_key))]
    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let start = Instant::now();

        match self.store.delete(&Path::from(storage_key)).await {
            Ok(()) => {
                tracing::info!(duration_ms = elapsed_ms(start), "S3 delete successful");
                Ok(())
            }
            Err(ObjectStoreError::NotFound { .. }) => {
                tracing::debug!("S3 delete of missing object");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, duration_ms = elapsed_ms(start), "S3 delete failed");
                Err(StorageError::DeleteFailed(e.to_string()))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket, key = %storage_key))]
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let start = Instant::now();

        let object = match self.store.get(&Path::from(storage_key)).await {
            Ok(object) => object,
            Err(ObjectStoreError::NotFound { .. }) => {
                return Err(StorageError::NotFound(storage_key.to_string()))
            }
            Err(e) => {
                tracing::error!(error = %e, "S3 download failed");
                return Err(StorageError::DownloadFailed(e.to_string()));
            }
        };

        let bytes = object
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::debug!(
            size_bytes = bytes.len(),
            duration_ms = elapsed_ms(start),
            "S3 download successful"
        );
        Ok(bytes.to_vec())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        match self.store.head(&Path::from(storage_key)).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::Backend(e.to_string())),
        }
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.url_base, storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aws_base_is_virtual_hosted() {
        assert_eq!(
            url_base("media", "eu-west-1", None, None),
            "https://media.s3.eu-west-1.amazonaws.com"
        );
    }

    #[test]
    fn custom_endpoint_base_is_path_style() {
        assert_eq!(
            url_base("media", "us-east-1", Some("http://localhost:9000/"), None),
            "http://localhost:9000/media"
        );
    }

    #[test]
    fn public_url_prefix_wins() {
        assert_eq!(
            url_base(
                "media",
                "eu-west-1",
                Some("http://localhost:9000"),
                Some("https://cdn.example.com/")
            ),
            "https://cdn.example.com"
        );
    }

    #[tokio::test]
    async fn builds_against_custom_endpoint_without_network() {
        let storage = S3Storage::new(
            "media".to_string(),
            "us-east-1".to_string(),
            Some("http://localhost:9000".to_string()),
            None,
        )
        .await
        .unwrap();

        assert_eq!(storage.backend_type(), StorageBackend::S3);
        assert_eq!(
            storage.public_url("production/others/abc-photo.jpg"),
            "http://localhost:9000/media/production/others/abc-photo.jpg"
        );
    }
}
