//! Route configuration and setup.

use crate::auth::jwt::JwtService;
use crate::auth::middleware::{auth_middleware, AuthState};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(&state.config.cors_origins, state.is_production)?;
    let auth_state = Arc::new(AuthState {
        jwt: Arc::new(JwtService::new(&state.config.jwt_secret)),
    });

    let public_routes = public_routes(state.clone());
    let protected_routes = protected_routes(state.clone()).layer(
        axum::middleware::from_fn_with_state(auth_state, auth_middleware),
    );

    // Multipart parts carry headers beyond the file bytes; leave headroom
    // above the validator's own size ceiling.
    let body_limit = state.config.max_document_size_bytes + 1024 * 1024;

    let app = public_routes
        .merge(protected_routes)
        .merge(Into::<Router<Arc<AppState>>>::into(
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"),
        ))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(origins: &[String], is_production: bool) -> Result<CorsLayer, anyhow::Error> {
    let cors = if origins.is_empty() || origins.contains(&"*".to_string()) {
        if is_production {
            tracing::warn!("CORS configured to allow all origins in production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    } else {
        let parsed = origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    };
    Ok(cors)
}

fn public_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/health",
            get({
                let state = state.clone();
                move || {
                    let state = state.clone();
                    async { handlers::health::health_check(state).await }
                }
            }),
        )
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

fn protected_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/v0/documents",
            post(handlers::document_upload::upload_document)
                .get(handlers::document_get::list_documents),
        )
        .route(
            "/api/v0/documents/{id}",
            get(handlers::document_get::get_document)
                .delete(handlers::document_delete::delete_document),
        )
        .route(
            "/api/v0/documents/{id}/download",
            get(handlers::document_download::download_document),
        )
        .route(
            "/api/v0/documents/{id}/unlock",
            post(handlers::unlock::unlock_document),
        )
        .route(
            "/api/v0/documents/{id}/status",
            put(handlers::document_status::update_document_status),
        )
        .route(
            "/api/v0/documents/{id}/file",
            post(handlers::document_replace::replace_document_file),
        )
        .route(
            "/api/v0/admin/documents",
            get(handlers::operator::list_all_documents),
        )
        .with_state(state)
}
