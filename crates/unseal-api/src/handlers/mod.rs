pub mod document_delete;
pub mod document_download;
pub mod document_get;
pub mod document_replace;
pub mod document_status;
pub mod document_upload;
pub mod health;
pub mod operator;
pub mod unlock;

use crate::auth::models::AuthContext;
use unseal_core::models::Document;
use unseal_core::AppError;

/// Fetch-or-404 guard shared by the single-document routes: the owner and
/// the operator may see the record, everyone else gets the same 404 as an
/// unknown id (no existence leak).
pub(crate) fn authorize_document_access(
    document: Option<Document>,
    ctx: &AuthContext,
) -> Result<Document, AppError> {
    match document {
        Some(doc) if doc.owner_id == ctx.user_id || ctx.is_operator() => Ok(doc),
        _ => Err(AppError::NotFound("Document not found".to_string())),
    }
}
