use super::MediaRepository;
use async_trait::async_trait;
use chrono::Utc;
use mediabox_core::models::{Media, NewMedia};
use mediabox_core::AppError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Media repository kept in process memory.
///
/// Mirrors the Postgres repository closely enough for service and HTTP tests,
/// including rejection of duplicate keys.
#[derive(Clone, Default)]
pub struct InMemoryMediaRepository {
    records: Arc<RwLock<HashMap<Uuid, Media>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryMediaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `create` and `replace_object` fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("media write rejected".to_string()));
        }
        Ok(())
    }
}

fn ensure_unique_key(
    records: &HashMap<Uuid, Media>,
    key: &str,
    except: Option<Uuid>,
) -> Result<(), AppError> {
    if records
        .values()
        .any(|m| m.key == key && Some(m.id) != except)
    {
        return Err(AppError::Internal(format!(
            "duplicate media key: {}",
            key
        )));
    }
    Ok(())
}

#[async_trait]
impl MediaRepository for InMemoryMediaRepository {
    async fn create(&self, new: NewMedia) -> Result<Media, AppError> {
        self.check_writable()?;
        let mut records = self.records.write().await;
        ensure_unique_key(&records, &new.object.key, None)?;

        let now = Utc::now();
        let media = Media {
            id: Uuid::new_v4(),
            key: new.object.key,
            url: new.object.url,
            content_type: new.content_type,
            size: new.size,
            created_at: now,
            updated_at: now,
        };
        records.insert(media.id, media.clone());
        Ok(media)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Media>, AppError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn replace_object(&self, id: Uuid, new: NewMedia) -> Result<Option<Media>, AppError> {
        self.check_writable()?;
        let mut records = self.records.write().await;
        if !records.contains_key(&id) {
            return Ok(None);
        }
        ensure_unique_key(&records, &new.object.key, Some(id))?;

        let Some(media) = records.get_mut(&id) else {
            return Ok(None);
        };
        media.key = new.object.key;
        media.url = new.object.url;
        media.content_type = new.content_type;
        media.size = new.size;
        media.updated_at = Utc::now();
        Ok(Some(media.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.records.write().await.remove(&id).is_some())
    }
}
