use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use unseal_core::AppError;
use uuid::Uuid;

/// Remove a document record and, best-effort, its blob. A failed blob delete
/// does not fail the request; the orphaned key is logged for reconciliation.
#[utoipa::path(
    delete,
    path = "/api/v0/documents/{id}",
    tag = "operator",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document deleted"),
        (status = 403, description = "Operator role required", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, HttpAppError> {
    ctx.require_operator().map_err(HttpAppError)?;

    let document = state
        .documents
        .get_by_id(id)
        .await
        .map_err(HttpAppError)?
        .ok_or_else(|| HttpAppError(AppError::NotFound("Document not found".to_string())))?;

    let removed = state.documents.delete(id).await.map_err(HttpAppError)?;
    if !removed {
        // Raced with another delete; the record is gone either way.
        return Err(HttpAppError(AppError::NotFound(
            "Document not found".to_string(),
        )));
    }

    if let Err(e) = state.storage.delete(&document.storage_key).await {
        tracing::warn!(
            document_id = %id,
            storage_key = %document.storage_key,
            error = %e,
            "Record deleted but blob removal failed, key orphaned"
        );
    }

    tracing::info!(document_id = %id, "Document deleted");

    Ok(Json(json!({ "deleted": true, "id": id })))
}
