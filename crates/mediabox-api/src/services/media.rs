//! Media service
//!
//! Keeps objects in storage and their metadata records in step. Every record
//! write happens after the object it points at has been written, and an object
//! whose record is never written (the write failed or the upload was dropped)
//! is removed again in the background.

use crate::error::storage_error;
use futures::future::try_join_all;
use mediabox_core::models::{Media, NewMedia, StoredObject, UploadedFile};
use mediabox_core::{AppError, ErrorMetadata};
use mediabox_db::{MediaRepository, PgMediaRepository};
use mediabox_storage::{generate_storage_key, Storage, DEFAULT_DIR};
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct MediaService {
    repository: Arc<dyn MediaRepository>,
    storage: Arc<dyn Storage>,
    base_path: String,
}

impl MediaService {
    /// # Arguments
    /// * `base_path` - Prefix for every storage key (usually the environment name)
    pub fn new(
        repository: Arc<dyn MediaRepository>,
        storage: Arc<dyn Storage>,
        base_path: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            storage,
            base_path: base_path.into(),
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Upload a batch of files into the default directory.
    ///
    /// Files are uploaded concurrently. The first failure is reported as a
    /// bad request and the remaining uploads are abandoned.
    #[tracing::instrument(skip(self, files), fields(file_count = files.len()))]
    pub async fn upload_files(&self, files: Vec<UploadedFile>) -> Result<Vec<Media>, AppError> {
        if files.is_empty() {
            return Err(AppError::BadRequest("Files are required".to_string()));
        }

        let uploads = files
            .into_iter()
            .map(|file| self.upload_file(file, DEFAULT_DIR, None));

        let media = try_join_all(uploads).await.map_err(|e| {
            tracing::warn!(error = %e, "Batch upload failed");
            AppError::BadRequest(e.client_message())
        })?;

        tracing::info!(uploaded = media.len(), "Batch upload completed");
        Ok(media)
    }

    /// Upload one file under `dir`.
    ///
    /// With `media_id`, the existing record keeps its id and is pointed at the
    /// new object; its previous object is deleted first.
    #[tracing::instrument(
        skip(self, file),
        fields(filename = %file.original_name, size_bytes = file.size(), media_id = ?media_id)
    )]
    pub async fn upload_file(
        &self,
        file: UploadedFile,
        dir: &str,
        media_id: Option<Uuid>,
    ) -> Result<Media, AppError> {
        let Some(id) = media_id else {
            let new = self.store_object(&file, dir).await?;
            let pending = self.pending(&new);
            let media = self.repository.create(new).await?;
            pending.keep();
            return Ok(media);
        };

        let existing = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not exists".to_string()))?;

        self.delete_object(&existing.key).await?;

        let new = self.store_object(&file, dir).await?;
        let pending = self.pending(&new);
        let media = self
            .repository
            .replace_object(id, new)
            .await?
            .ok_or_else(|| AppError::NotFound("File not exists".to_string()))?;
        pending.keep();
        Ok(media)
    }

    /// Upload one file and insert its record inside the caller's transaction.
    ///
    /// If the caller later rolls back, the uploaded object is left behind and
    /// must be removed by the caller.
    #[tracing::instrument(
        skip(self, tx, file),
        fields(filename = %file.original_name, size_bytes = file.size())
    )]
    pub async fn upload_file_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        file: UploadedFile,
        dir: &str,
    ) -> Result<Media, AppError> {
        let new = self.store_object(&file, dir).await?;
        let pending = self.pending(&new);
        let media = PgMediaRepository::create_tx(tx, new).await?;
        pending.keep();
        Ok(media)
    }

    pub async fn get(&self, id: Uuid) -> Result<Media, AppError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not exists".to_string()))
    }

    /// Delete a record and its object. The object goes first so a failure
    /// never leaves a record pointing at nothing.
    #[tracing::instrument(skip(self), fields(media_id = %id))]
    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let media = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not exists".to_string()))?;

        self.delete_object(&media.key).await?;

        if !self.repository.delete(id).await? {
            tracing::debug!(media_id = %id, "Record already removed");
        }

        tracing::info!(media_id = %id, key = %media.key, "Media deleted");
        Ok(())
    }

    async fn store_object(&self, file: &UploadedFile, dir: &str) -> Result<NewMedia, AppError> {
        let key = generate_storage_key(&self.base_path, dir, &file.original_name)
            .map_err(storage_error)?;

        let url = self
            .storage
            .upload_with_key(&key, file.data.clone(), &file.content_type)
            .await
            .map_err(storage_error)?;

        Ok(NewMedia::new(
            StoredObject { key, url },
            file.content_type.clone(),
            file.size(),
        ))
    }

    async fn delete_object(&self, key: &str) -> Result<(), AppError> {
        self.storage.delete(key).await.map_err(storage_error)
    }

    fn pending(&self, new: &NewMedia) -> PendingObject {
        PendingObject {
            storage: self.storage.clone(),
            key: Some(new.object.key.clone()),
        }
    }
}

/// An uploaded object whose record is not written yet.
///
/// Dropping it without `keep` deletes the object in the background. That covers
/// a failed record write as well as an upload future dropped mid-way, e.g. by
/// `try_join_all` after another file in the batch failed.
struct PendingObject {
    storage: Arc<dyn Storage>,
    key: Option<String>,
}

impl PendingObject {
    fn keep(mut self) {
        self.key = None;
    }
}

impl Drop for PendingObject {
    fn drop(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(key = %key, "No runtime left to remove orphaned object");
            return;
        };
        let storage = self.storage.clone();
        runtime.spawn(async move {
            match storage.delete(&key).await {
                Ok(()) => tracing::debug!(key = %key, "Removed orphaned object"),
                Err(e) => {
                    tracing::warn!(error = %e, key = %key, "Failed to remove orphaned object")
                }
            }
        });
    }
}
