//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use mediabox_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mediabox API",
        version = "0.1.0",
        description = "Upload files to object storage and manage their metadata records. Media endpoints are versioned under /api/v0/ and require `Authorization: Bearer <API_KEY>`."
    ),
    paths(
        handlers::media_upload::upload_files,
        handlers::media_get::get_media,
        handlers::media_delete::delete_media,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::MediaResponse,
            handlers::media_upload::UploadFilesForm,
            handlers::media_delete::MessageResponse,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "media", description = "Upload, fetch and delete media"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_media_route() {
        let spec = ApiDoc::openapi();
        let paths = &spec.paths.paths;
        assert!(paths.contains_key("/api/v0/media/upload-files"));
        assert!(paths.contains_key("/api/v0/media/{id}"));
        assert!(paths.contains_key("/health"));
    }
}
