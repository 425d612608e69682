//! Multipart extraction for upload handlers

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use mediabox_core::models::UploadedFile;
use mediabox_core::AppError;

/// Form field carrying uploaded files; may repeat
pub const FILES_FIELD: &str = "files";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
const DEFAULT_FILENAME: &str = "file";

/// Collect every `files` field of a multipart form.
///
/// Other fields are ignored. An empty result is not an error here; the media
/// service decides what an empty batch means.
pub async fn extract_multipart_files(
    mut multipart: Multipart,
    max_file_size: usize,
    max_files: usize,
) -> Result<Vec<UploadedFile>, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart", e))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }

        if files.len() >= max_files {
            return Err(AppError::BadRequest(format!(
                "Too many files; at most {} are accepted per request",
                max_files
            )));
        }

        let original_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read file data", e))?;

        validate_file_size(data.len(), max_file_size)?;

        files.push(UploadedFile::new(original_name, content_type, data));
    }

    Ok(files)
}

fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(format!("{}: request body too large", context));
    }
    AppError::BadRequest(format!("{}: {}", context, err.body_text()))
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_at_limit_is_accepted() {
        assert!(validate_file_size(1024, 1024).is_ok());
        assert!(validate_file_size(0, 1024).is_ok());
    }

    #[test]
    fn file_over_limit_is_rejected() {
        let err = validate_file_size(10 * 1024 * 1024 + 1, 10 * 1024 * 1024).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(ref msg) if msg.contains("10 MB")));
    }
}
