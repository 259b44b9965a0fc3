//! Lifecycle service.
//!
//! Thin coordinator over the document repository: applies operator-driven
//! status transitions and keeps signed references fresh on the access path.
//! Transition legality itself is enforced in `unseal_core::lifecycle`.

use chrono::Utc;
use std::time::Duration;
use unseal_core::models::{Document, DocumentStatus};
use unseal_core::AppError;
use unseal_db::DocumentRepository;
use uuid::Uuid;

#[derive(Clone)]
pub struct LifecycleService {
    documents: DocumentRepository,
    signed_url_ttl: Duration,
}

impl LifecycleService {
    pub fn new(documents: DocumentRepository, signed_url_ttl_secs: u64) -> Self {
        Self {
            documents,
            signed_url_ttl: Duration::from_secs(signed_url_ttl_secs),
        }
    }

    /// Apply an operator-requested transition. `None` when the id is unknown;
    /// illegal moves surface as `AppError::InvalidTransition`.
    pub async fn advance(
        &self,
        id: Uuid,
        new_status: DocumentStatus,
    ) -> Result<Option<Document>, AppError> {
        let updated = self
            .documents
            .update_status(id, new_status, self.signed_url_ttl)
            .await?;

        if let Some(ref document) = updated {
            tracing::info!(
                document_id = %document.id,
                status = %document.status,
                "Document status advanced"
            );
        }

        Ok(updated)
    }

    /// Return the document with valid signed references, re-issuing them when
    /// the stored ones have expired. Only meaningful for `ready`/`completed`
    /// records; anything else is returned untouched.
    pub async fn ensure_fresh_refs(&self, document: Document) -> Result<Document, AppError> {
        if !document.is_unlockable() || !document.download_ref_expired(Utc::now()) {
            return Ok(document);
        }

        tracing::debug!(
            document_id = %document.id,
            "Signed references expired, re-issuing"
        );

        let refreshed = self
            .documents
            .refresh_signed_refs(document.id, &document.storage_key, self.signed_url_ttl)
            .await?;

        // The row disappearing between fetch and refresh means a concurrent
        // delete; surface it as not found.
        refreshed.ok_or_else(|| AppError::NotFound("Document not found".to_string()))
    }
}
