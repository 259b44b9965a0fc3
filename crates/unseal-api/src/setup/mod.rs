//! Application setup and initialization
//!
//! All application initialization logic lives here, extracted from main.rs
//! for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::services::lifecycle::LifecycleService;
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use unseal_core::validation::DocumentValidator;
use unseal_core::Config;
use unseal_db::{DocumentRepository, PurchaseRepository};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();
    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let state = build_state(config, pool, storage);
    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}

/// Assemble repositories, validator, and lifecycle service into the shared
/// state. Also used directly by integration tests.
pub fn build_state(
    config: Config,
    pool: sqlx::PgPool,
    storage: Arc<dyn unseal_storage::Storage>,
) -> Arc<AppState> {
    let documents = DocumentRepository::new(pool.clone(), storage.clone());
    let purchases = PurchaseRepository::new(pool.clone());
    let validator = DocumentValidator::new(
        config.max_document_size_bytes,
        config.allowed_extensions.clone(),
        config.allowed_content_types.clone(),
    );
    let lifecycle = LifecycleService::new(documents.clone(), config.signed_url_ttl_secs);
    let is_production = config.is_production();

    Arc::new(AppState {
        config,
        pool,
        documents,
        purchases,
        storage,
        validator,
        lifecycle,
        is_production,
    })
}
