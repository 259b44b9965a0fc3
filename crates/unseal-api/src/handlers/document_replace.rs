use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use unseal_core::models::DocumentResponse;
use unseal_core::AppError;
use uuid::Uuid;

/// Operator uploads the decrypted file over the original blob. The storage
/// key and filename stay the same; only content type and size are recorded.
#[utoipa::path(
    post,
    path = "/api/v0/documents/{id}/file",
    tag = "operator",
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Decrypted file substituted", body = DocumentResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Operator role required", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn replace_document_file(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<DocumentResponse>, HttpAppError> {
    ctx.require_operator().map_err(HttpAppError)?;

    let document = state
        .documents
        .get_by_id(id)
        .await
        .map_err(HttpAppError)?
        .ok_or_else(|| HttpAppError(AppError::NotFound("Document not found".to_string())))?;

    let mut replacement: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpAppError(AppError::InvalidInput(format!("Invalid multipart body: {}", e))))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .ok_or_else(|| HttpAppError(AppError::InvalidInput("Missing content type".to_string())))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| {
                HttpAppError(AppError::InvalidInput(format!("Failed to read file data: {}", e)))
            })?
            .to_vec();
        replacement = Some((content_type, data));
        break;
    }

    let (content_type, data) = replacement.ok_or_else(|| {
        HttpAppError(AppError::InvalidInput(
            "Missing 'file' field in multipart body".to_string(),
        ))
    })?;

    state.validator.validate_file_size(data.len())?;
    state.validator.validate_content_type(&content_type)?;

    let size_bytes = data.len() as i64;
    state
        .storage
        .replace(&document.storage_key, &content_type, data)
        .await?;

    let updated = state
        .documents
        .record_replacement(document.id, &content_type, size_bytes)
        .await
        .map_err(HttpAppError)?
        .ok_or_else(|| HttpAppError(AppError::NotFound("Document not found".to_string())))?;

    tracing::info!(
        document_id = %updated.id,
        size_bytes = updated.size_bytes,
        "Decrypted file substituted"
    );

    Ok(Json(DocumentResponse::from_document(updated, true)))
}
