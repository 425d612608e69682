//! Media metadata repositories

#[cfg(any(test, feature = "test-utils"))]
mod memory;
mod postgres;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryMediaRepository;
pub use postgres::PgMediaRepository;

use async_trait::async_trait;
use mediabox_core::models::{Media, NewMedia};
use mediabox_core::AppError;
use uuid::Uuid;

/// Storage of media records
///
/// Implementations never touch object storage; callers are responsible for
/// keeping records and objects in step.
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Insert a new record with a freshly generated id
    async fn create(&self, new: NewMedia) -> Result<Media, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Media>, AppError>;

    /// Point an existing record at a new object, keeping its id and `created_at`.
    ///
    /// Returns `None` when no record has this id.
    async fn replace_object(&self, id: Uuid, new: NewMedia) -> Result<Option<Media>, AppError>;

    /// Delete a record. Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
