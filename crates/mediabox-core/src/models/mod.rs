pub mod media;

pub use media::{Media, MediaResponse, NewMedia, StoredObject, UploadedFile};
