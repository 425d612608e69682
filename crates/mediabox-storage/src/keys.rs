//! Shared key generation for storage backends.
//!
//! Key format: `{base_path}/{dir}/{uuid}-{filename}`. Empty `base_path` or
//! `dir` segments are dropped rather than producing `//`.

use crate::{StorageError, StorageResult};
use uuid::Uuid;

/// Directory used when the caller does not group uploads
pub const DEFAULT_DIR: &str = "others";

const MAX_FILENAME_LENGTH: usize = 255;

/// Generate a unique storage key for an upload.
pub fn generate_storage_key(
    base_path: &str,
    dir: &str,
    original_name: &str,
) -> StorageResult<String> {
    let filename = sanitize_filename(original_name);
    let mut segments: Vec<String> = Vec::with_capacity(3);

    for prefix in [base_path, dir] {
        let trimmed = prefix.trim_matches('/');
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.split('/').any(|s| s == "..") {
            return Err(StorageError::InvalidKey(format!(
                "Key prefix contains path traversal: {}",
                prefix
            )));
        }
        segments.push(trimmed.to_string());
    }

    segments.push(format!("{}-{}", Uuid::new_v4(), filename));
    Ok(segments.join("/"))
}

/// Sanitize a client-supplied filename so it is safe to embed in a key.
///
/// Directory components are stripped, anything outside `[A-Za-z0-9._-]` becomes
/// `_`, and names that end up too short fall back to `file`. Dots are kept: the
/// result is always joined behind a `{uuid}-` prefix, so it never forms a path
/// segment of its own.
pub fn sanitize_filename(filename: &str) -> String {
    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('_').is_empty() || sanitized.len() < 3 {
        return "file".to_string();
    }

    sanitized
}
