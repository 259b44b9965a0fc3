use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::authorize_document_access;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use unseal_core::models::{DocumentResponse, PurchaseResponse};
use unseal_core::AppError;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct UnlockResponse {
    pub purchase: PurchaseResponse,
    pub document: DocumentResponse,
}

#[utoipa::path(
    post,
    path = "/api/v0/documents/{id}/unlock",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Purchase recorded (idempotent)", body = UnlockResponse),
        (status = 400, description = "Document not ready to unlock", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn unlock_document(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<UnlockResponse>, HttpAppError> {
    let document = state.documents.get_by_id(id).await.map_err(HttpAppError)?;
    let document = authorize_document_access(document, &ctx).map_err(HttpAppError)?;

    if !document.is_unlockable() {
        return Err(HttpAppError(AppError::InvalidInput(format!(
            "Document is not ready to unlock (status: {})",
            document.status
        ))));
    }

    // Simulated payment settlement; there is no real provider behind this.
    if state.config.settlement_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(state.config.settlement_delay_ms)).await;
    }

    let purchase = state
        .purchases
        .create(document.id, ctx.user_id, state.config.unlock_price_cents)
        .await
        .map_err(HttpAppError)?;

    tracing::info!(
        document_id = %document.id,
        payer_id = %ctx.user_id,
        amount_cents = purchase.amount_cents,
        "Document unlocked"
    );

    let document = state
        .lifecycle
        .ensure_fresh_refs(document)
        .await
        .map_err(HttpAppError)?;

    Ok(Json(UnlockResponse {
        purchase: purchase.into(),
        document: DocumentResponse::from_document(document, true),
    }))
}
