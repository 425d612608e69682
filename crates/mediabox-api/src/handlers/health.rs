use crate::constants::API_VERSION;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    /// Storage backend in use
    #[schema(example = "s3")]
    pub storage: String,
    #[schema(example = "v0")]
    pub api_version: String,
}

/// Liveness probe; does not require authentication
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        storage: state.media.storage().backend_type().to_string(),
        api_version: API_VERSION.to_string(),
    })
}
