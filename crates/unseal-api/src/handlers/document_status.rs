use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use unseal_core::models::{DocumentResponse, DocumentStatus};
use unseal_core::AppError;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: DocumentStatus,
}

#[utoipa::path(
    put,
    path = "/api/v0/documents/{id}/status",
    tag = "operator",
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = DocumentResponse),
        (status = 403, description = "Operator role required", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 409, description = "Illegal status transition", body = ErrorResponse)
    )
)]
pub async fn update_document_status(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<DocumentResponse>, HttpAppError> {
    ctx.require_operator().map_err(HttpAppError)?;

    let updated = state
        .lifecycle
        .advance(id, body.status)
        .await
        .map_err(HttpAppError)?
        .ok_or_else(|| HttpAppError(AppError::NotFound("Document not found".to_string())))?;

    Ok(Json(DocumentResponse::from_document(updated, true)))
}
