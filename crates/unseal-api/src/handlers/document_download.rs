use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::authorize_document_access;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use unseal_core::AppError;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct DownloadResponse {
    pub download_url: String,
    pub expires_at: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/v0/documents/{id}/download",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Time-limited download URL", body = DownloadResponse),
        (status = 400, description = "Document not ready", body = ErrorResponse),
        (status = 402, description = "No purchase for this document", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn download_document(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<DownloadResponse>, HttpAppError> {
    let document = state.documents.get_by_id(id).await.map_err(HttpAppError)?;
    let document = authorize_document_access(document, &ctx).map_err(HttpAppError)?;

    if !document.is_unlockable() {
        return Err(HttpAppError(AppError::InvalidInput(format!(
            "Document is not ready for download (status: {})",
            document.status
        ))));
    }

    // Entitlement check on every access; the operator administers the
    // document and is exempt.
    if !ctx.is_operator()
        && !state
            .purchases
            .exists(document.id, ctx.user_id)
            .await
            .map_err(HttpAppError)?
    {
        return Err(HttpAppError(AppError::PaymentRequired(
            "Unlock this document to download it".to_string(),
        )));
    }

    let document = state
        .lifecycle
        .ensure_fresh_refs(document)
        .await
        .map_err(HttpAppError)?;

    let download_url = document.download_url.clone().ok_or_else(|| {
        HttpAppError(AppError::Internal(
            "Ready document is missing its download reference".to_string(),
        ))
    })?;
    let expires_at = document.download_expires_at.ok_or_else(|| {
        HttpAppError(AppError::Internal(
            "Ready document is missing its reference expiry".to_string(),
        ))
    })?;

    Ok(Json(DownloadResponse {
        download_url,
        expires_at,
    }))
}
