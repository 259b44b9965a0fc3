//! Application state shared across handlers.

use crate::services::lifecycle::LifecycleService;
use sqlx::PgPool;
use std::sync::Arc;
use unseal_core::validation::DocumentValidator;
use unseal_core::Config;
use unseal_db::{DocumentRepository, PurchaseRepository};
use unseal_storage::Storage;

/// Main application state: configuration, repositories, storage, and the
/// lifecycle service. Cheap to clone behind `Arc` for axum.
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub documents: DocumentRepository,
    pub purchases: PurchaseRepository,
    pub storage: Arc<dyn Storage>,
    pub validator: DocumentValidator,
    pub lifecycle: LifecycleService,
    pub is_production: bool,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
