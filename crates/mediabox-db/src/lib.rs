//! Mediabox Database Library
//!
//! Persistence for media metadata records. The `MediaRepository` trait is the
//! seam the API crate depends on; `PgMediaRepository` is the production
//! implementation and `InMemoryMediaRepository` (feature `test-utils`) backs
//! tests that should not need a database.

pub mod media;
pub mod transaction;

#[cfg(any(test, feature = "test-utils"))]
pub use media::InMemoryMediaRepository;
pub use media::{MediaRepository, PgMediaRepository};
pub use transaction::with_transaction;
