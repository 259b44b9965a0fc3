use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use unseal_core::models::{Document, DocumentKind, DocumentStatus};
use utoipa::ToSchema;
use uuid::Uuid;

/// One row in the operator console listing. Unlike the user-facing
/// [`unseal_core::models::DocumentResponse`], this exposes the owner and a
/// staleness flag but never the signed references.
#[derive(Debug, Serialize, ToSchema)]
pub struct OperatorDocumentResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub file_name: String,
    pub kind: DocumentKind,
    pub size_bytes: i64,
    pub status: DocumentStatus,
    pub stale: bool,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OperatorDocumentResponse {
    fn from_document(doc: Document, now: DateTime<Utc>, stale_after_secs: i64) -> Self {
        let stale = doc.is_stale(now, stale_after_secs);
        OperatorDocumentResponse {
            id: doc.id,
            owner_id: doc.owner_id,
            file_name: doc.file_name,
            kind: doc.kind,
            size_bytes: doc.size_bytes,
            status: doc.status,
            stale,
            uploaded_at: doc.uploaded_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OperatorConsoleResponse {
    pub documents: Vec<OperatorDocumentResponse>,
    /// Suggested client refresh interval in seconds.
    pub poll_interval_secs: u64,
}

#[utoipa::path(
    get,
    path = "/api/v0/admin/documents",
    tag = "operator",
    responses(
        (status = 200, description = "All documents with staleness flags", body = OperatorConsoleResponse),
        (status = 403, description = "Operator role required", body = ErrorResponse)
    )
)]
pub async fn list_all_documents(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> Result<Json<OperatorConsoleResponse>, HttpAppError> {
    ctx.require_operator().map_err(HttpAppError)?;

    let now = Utc::now();
    let stale_after = state.config.stale_pending_after_secs;

    let documents = state
        .documents
        .list_all()
        .await
        .map_err(HttpAppError)?
        .into_iter()
        .map(|doc| OperatorDocumentResponse::from_document(doc, now, stale_after))
        .collect();

    Ok(Json(OperatorConsoleResponse {
        documents,
        poll_interval_secs: state.config.operator_poll_interval_secs,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_document(uploaded_at: DateTime<Utc>) -> Document {
        Document {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            file_name: "report.pdf".to_string(),
            kind: DocumentKind::Pdf,
            content_type: "application/pdf".to_string(),
            size_bytes: 1024,
            password_protected: true,
            status: DocumentStatus::Pending,
            storage_key: "documents/x/y.pdf".to_string(),
            thumbnail_url: "https://placehold.co/600x400".to_string(),
            preview_url: None,
            preview_expires_at: None,
            download_url: None,
            download_expires_at: None,
            uploaded_at,
            updated_at: uploaded_at,
        }
    }

    #[test]
    fn test_stale_flag_tracks_threshold() {
        let now = Utc::now();

        let old = pending_document(now - chrono::Duration::days(2));
        let row = OperatorDocumentResponse::from_document(old, now, 86_400);
        assert!(row.stale);

        let fresh = pending_document(now - chrono::Duration::hours(1));
        let row = OperatorDocumentResponse::from_document(fresh, now, 86_400);
        assert!(!row.stale);
    }
}
