use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use utoipa::ToSchema;
use uuid::Uuid;

/// Processing/payment lifecycle status of a document.
///
/// The status vocabulary is fixed and case-sensitive:
/// `pending | processing | ready | completed`. Legal transitions are enforced
/// by [`crate::lifecycle::validate_transition`]; the repository never writes
/// an illegal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "document_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Ready,
    Completed,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentStatus::Pending => write!(f, "pending"),
            DocumentStatus::Processing => write!(f, "processing"),
            DocumentStatus::Ready => write!(f, "ready"),
            DocumentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Coarse document kind derived from the file extension at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "document_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Word,
    Excel,
    Other,
}

impl DocumentKind {
    /// Classify a filename by its extension.
    pub fn from_filename(filename: &str) -> Self {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => DocumentKind::Pdf,
            "doc" | "docx" => DocumentKind::Word,
            "xls" | "xlsx" | "csv" => DocumentKind::Excel,
            _ => DocumentKind::Other,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "pdf"),
            DocumentKind::Word => write!(f, "word"),
            DocumentKind::Excel => write!(f, "excel"),
            DocumentKind::Other => write!(f, "other"),
        }
    }
}

/// One uploaded file and its processing/payment state.
///
/// `preview_url`/`download_url` are populated if and only if the status is
/// `ready` or later. `owner_id` and `uploaded_at` are immutable after
/// creation; no update path touches them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub file_name: String,
    pub kind: DocumentKind,
    pub content_type: String,
    pub size_bytes: i64,
    pub password_protected: bool,
    pub status: DocumentStatus,
    pub storage_key: String,
    pub thumbnail_url: String,
    pub preview_url: Option<String>,
    pub preview_expires_at: Option<DateTime<Utc>>,
    pub download_url: Option<String>,
    pub download_expires_at: Option<DateTime<Utc>>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Whether the decrypted file is available for paid access.
    pub fn is_unlockable(&self) -> bool {
        matches!(
            self.status,
            DocumentStatus::Ready | DocumentStatus::Completed
        )
    }

    /// Whether the stored download reference has expired (or was never issued).
    pub fn download_ref_expired(&self, now: DateTime<Utc>) -> bool {
        match self.download_expires_at {
            Some(expires_at) => expires_at <= now,
            None => true,
        }
    }

    /// Pending longer than `threshold_secs` with no operator action.
    pub fn is_stale(&self, now: DateTime<Utc>, threshold_secs: i64) -> bool {
        self.status == DocumentStatus::Pending
            && (now - self.uploaded_at).num_seconds() > threshold_secs
    }
}

/// Fresh signed references issued when a document enters (or refreshes) `ready`.
#[derive(Debug, Clone)]
pub struct SignedRefs {
    pub preview_url: String,
    pub preview_expires_at: DateTime<Utc>,
    pub download_url: String,
    pub download_expires_at: DateTime<Utc>,
}

/// API representation of a document.
///
/// Signed references are withheld until the caller holds an entitlement;
/// the thumbnail locator is always present.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub file_name: String,
    pub kind: DocumentKind,
    pub size_bytes: i64,
    pub password_protected: bool,
    pub status: DocumentStatus,
    pub thumbnail_url: String,
    pub unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl DocumentResponse {
    /// Build a response, exposing signed references only to entitled callers.
    pub fn from_document(doc: Document, unlocked: bool) -> Self {
        let (preview_url, download_url) = if unlocked {
            (doc.preview_url, doc.download_url)
        } else {
            (None, None)
        };
        DocumentResponse {
            id: doc.id,
            file_name: doc.file_name,
            kind: doc.kind,
            size_bytes: doc.size_bytes,
            password_protected: doc.password_protected,
            status: doc.status,
            thumbnail_url: doc.thumbnail_url,
            unlocked,
            preview_url,
            download_url,
            uploaded_at: doc.uploaded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_document(status: DocumentStatus) -> Document {
        let now = Utc::now();
        Document {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            file_name: "report.pdf".to_string(),
            kind: DocumentKind::Pdf,
            content_type: "application/pdf".to_string(),
            size_bytes: 2_097_152,
            password_protected: true,
            status,
            storage_key: "documents/owner/doc.pdf".to_string(),
            thumbnail_url: "https://placehold.co/600x400".to_string(),
            preview_url: None,
            preview_expires_at: None,
            download_url: None,
            download_expires_at: None,
            uploaded_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_kind_from_filename() {
        assert_eq!(DocumentKind::from_filename("report.pdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("plan.DOCX"), DocumentKind::Word);
        assert_eq!(DocumentKind::from_filename("data.doc"), DocumentKind::Word);
        assert_eq!(
            DocumentKind::from_filename("sheet.xlsx"),
            DocumentKind::Excel
        );
        assert_eq!(DocumentKind::from_filename("rows.csv"), DocumentKind::Excel);
        assert_eq!(
            DocumentKind::from_filename("archive.zip"),
            DocumentKind::Other
        );
        assert_eq!(
            DocumentKind::from_filename("noextension"),
            DocumentKind::Other
        );
    }

    #[test]
    fn test_status_serde_vocabulary() {
        assert_eq!(
            serde_json::to_string(&DocumentStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::from_str::<DocumentStatus>("\"completed\"").unwrap(),
            DocumentStatus::Completed
        );
        // Vocabulary is case-sensitive and fixed.
        assert!(serde_json::from_str::<DocumentStatus>("\"Pending\"").is_err());
        assert!(serde_json::from_str::<DocumentStatus>("\"archived\"").is_err());
    }

    #[test]
    fn test_is_unlockable() {
        assert!(!test_document(DocumentStatus::Pending).is_unlockable());
        assert!(!test_document(DocumentStatus::Processing).is_unlockable());
        assert!(test_document(DocumentStatus::Ready).is_unlockable());
        assert!(test_document(DocumentStatus::Completed).is_unlockable());
    }

    #[test]
    fn test_download_ref_expired() {
        let now = Utc::now();
        let mut doc = test_document(DocumentStatus::Ready);
        assert!(doc.download_ref_expired(now), "missing ref counts as expired");

        doc.download_expires_at = Some(now + chrono::Duration::hours(24));
        assert!(!doc.download_ref_expired(now));

        doc.download_expires_at = Some(now - chrono::Duration::seconds(1));
        assert!(doc.download_ref_expired(now));
    }

    #[test]
    fn test_staleness_only_applies_to_pending() {
        let now = Utc::now();
        let mut doc = test_document(DocumentStatus::Pending);
        doc.uploaded_at = now - chrono::Duration::days(2);
        assert!(doc.is_stale(now, 86_400));

        doc.status = DocumentStatus::Ready;
        assert!(!doc.is_stale(now, 86_400));

        let fresh = test_document(DocumentStatus::Pending);
        assert!(!fresh.is_stale(now, 86_400));
    }

    #[test]
    fn test_response_withholds_refs_until_unlocked() {
        let mut doc = test_document(DocumentStatus::Ready);
        doc.preview_url = Some("https://example.com/preview".to_string());
        doc.download_url = Some("https://example.com/download".to_string());

        let locked = DocumentResponse::from_document(doc.clone(), false);
        assert!(!locked.unlocked);
        assert!(locked.preview_url.is_none());
        assert!(locked.download_url.is_none());
        assert!(!locked.thumbnail_url.is_empty());

        let unlocked = DocumentResponse::from_document(doc, true);
        assert!(unlocked.unlocked);
        assert_eq!(
            unlocked.preview_url.as_deref(),
            Some("https://example.com/preview")
        );
        assert_eq!(
            unlocked.download_url.as_deref(),
            Some("https://example.com/download")
        );
    }
}
