use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::authorize_document_access;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use std::collections::HashSet;
use std::sync::Arc;
use unseal_core::models::DocumentResponse;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/v0/documents/{id}",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document details", body = DocumentResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentResponse>, HttpAppError> {
    let document = state.documents.get_by_id(id).await.map_err(HttpAppError)?;
    let document = authorize_document_access(document, &ctx).map_err(HttpAppError)?;

    let unlocked = ctx.is_operator()
        || state
            .purchases
            .exists(document.id, ctx.user_id)
            .await
            .map_err(HttpAppError)?;

    // Entitled callers get fresh references even if the stored ones lapsed.
    let document = if unlocked {
        state
            .lifecycle
            .ensure_fresh_refs(document)
            .await
            .map_err(HttpAppError)?
    } else {
        document
    };

    Ok(Json(DocumentResponse::from_document(document, unlocked)))
}

#[utoipa::path(
    get,
    path = "/api/v0/documents",
    tag = "documents",
    responses(
        (status = 200, description = "Caller's documents, most recent first", body = [DocumentResponse])
    )
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> Result<Json<Vec<DocumentResponse>>, HttpAppError> {
    let documents = state
        .documents
        .list_by_owner(ctx.user_id)
        .await
        .map_err(HttpAppError)?;

    let unlocked_ids: HashSet<Uuid> = state
        .purchases
        .unlocked_document_ids(ctx.user_id)
        .await
        .map_err(HttpAppError)?
        .into_iter()
        .collect();

    let responses = documents
        .into_iter()
        .map(|doc| {
            let unlocked = unlocked_ids.contains(&doc.id);
            DocumentResponse::from_document(doc, unlocked)
        })
        .collect();

    Ok(Json(responses))
}
