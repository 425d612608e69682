//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::services::media::MediaService;
use crate::state::AppState;
use anyhow::Result;
use mediabox_core::Config;
use mediabox_db::PgMediaRepository;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let repository = Arc::new(PgMediaRepository::new(pool));
    let media = MediaService::new(repository, storage, config.storage_base_path.clone());
    let state = Arc::new(AppState::new(config.clone(), media));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
