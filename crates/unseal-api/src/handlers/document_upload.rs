use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    Json,
};
use std::path::Path;
use std::sync::Arc;
use unseal_core::models::{DocumentKind, DocumentResponse};
use unseal_core::AppError;
use uuid::Uuid;

struct UploadedFile {
    filename: String,
    content_type: String,
    data: Vec<u8>,
}

/// Pull the single `file` part out of the multipart body.
async fn read_file_part(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(sanitize_filename)
            .ok_or_else(|| AppError::InvalidInput("Missing filename".to_string()))?;
        let content_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .ok_or_else(|| AppError::InvalidInput("Missing content type".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?
            .to_vec();

        return Ok(UploadedFile {
            filename,
            content_type,
            data,
        });
    }

    Err(AppError::InvalidInput(
        "Missing 'file' field in multipart body".to_string(),
    ))
}

/// Strip any path components and control characters from a client filename.
fn sanitize_filename(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}

#[utoipa::path(
    post,
    path = "/api/v0/documents",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Document uploaded, status pending", body = DocumentResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    multipart: Multipart,
) -> Result<Json<DocumentResponse>, HttpAppError> {
    let file = read_file_part(multipart).await.map_err(HttpAppError)?;

    state
        .validator
        .validate_all(&file.filename, &file.content_type, file.data.len())?;

    let document_id = Uuid::new_v4();
    let kind = DocumentKind::from_filename(&file.filename);
    let size_bytes = file.data.len() as i64;
    let extension = Path::new(&file.filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    let storage_key = state
        .storage
        .put(
            ctx.user_id,
            document_id,
            extension,
            &file.content_type,
            file.data,
        )
        .await?;

    let document = match state
        .documents
        .create(
            document_id,
            ctx.user_id,
            file.filename,
            kind,
            file.content_type,
            size_bytes,
            storage_key.clone(),
            state.config.thumbnail_placeholder_url.clone(),
        )
        .await
    {
        Ok(document) => document,
        Err(e) => {
            // Cleanup storage on database failure
            let storage = state.storage.clone();
            tokio::spawn(async move {
                if let Err(cleanup_err) = storage.delete(&storage_key).await {
                    tracing::warn!(
                        error = %cleanup_err,
                        storage_key = %storage_key,
                        "Failed to cleanup blob after DB error"
                    );
                }
            });
            return Err(HttpAppError(e));
        }
    };

    tracing::info!(
        document_id = %document.id,
        owner_id = %document.owner_id,
        size_bytes = document.size_bytes,
        kind = %document.kind,
        "Document uploaded"
    );

    Ok(Json(DocumentResponse::from_document(document, false)))
}
