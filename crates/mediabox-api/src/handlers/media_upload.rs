use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use mediabox_core::models::MediaResponse;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_multipart_files;

/// Multipart body of an upload request
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadFilesForm {
    /// One or more files; repeat the field for each file
    #[schema(value_type = Vec<String>, format = Binary)]
    files: Vec<Vec<u8>>,
}

/// Upload files handler
///
/// Stores every `files` part as its own object and metadata record. All
/// files are uploaded concurrently; if any fails the request fails.
///
/// # Errors
/// - `AppError::BadRequest` - No files, too many files, or an upload failed
/// - `AppError::PayloadTooLarge` - A file exceeds the size limit
#[utoipa::path(
    post,
    path = "/api/v0/media/upload-files",
    tag = "media",
    request_body(content = UploadFilesForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Files uploaded", body = Vec<MediaResponse>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_files"))]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let files = extract_multipart_files(
        multipart,
        state.config.max_file_size_bytes,
        state.config.max_files_per_request,
    )
    .await?;

    let media = state.media.upload_files(files).await?;

    let response: Vec<MediaResponse> = media.into_iter().map(MediaResponse::from).collect();
    Ok((StatusCode::CREATED, Json(response)))
}
