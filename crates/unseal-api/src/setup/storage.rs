//! Storage backend setup

use anyhow::Result;
use std::sync::Arc;
use unseal_core::Config;
use unseal_storage::Storage;

/// Create the configured storage backend.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = unseal_storage::create_storage(config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage backend: {}", e))?;

    tracing::info!(backend = %config.storage_backend, "Storage backend initialized");
    Ok(storage)
}
