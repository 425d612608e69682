//! Storage setup and initialization

use anyhow::{Context, Result};
use mediabox_core::Config;
use mediabox_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = %storage.backend_type(),
        base_path = %config.storage_base_path,
        "Storage initialized successfully"
    );

    Ok(storage)
}
