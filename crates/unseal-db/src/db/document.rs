//! Document record repository.
//!
//! Coordinates the `documents` table with the storage backend: entering (or
//! refreshing) `ready` is the one transition with a side effect, issuing
//! signed preview/download references before the row is updated.

use chrono::Utc;
use sqlx::{PgPool, Postgres};
use std::sync::Arc;
use std::time::Duration;
use unseal_core::models::{Document, DocumentKind, DocumentStatus, SignedRefs};
use unseal_core::{validate_transition, AppError};
use unseal_storage::Storage;
use uuid::Uuid;

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
    storage: Arc<dyn Storage>,
}

impl DocumentRepository {
    pub fn new(pool: PgPool, storage: Arc<dyn Storage>) -> Self {
        Self { pool, storage }
    }

    /// Insert a new record for an already-uploaded blob. Status starts at
    /// `pending`; `uploaded_at` is set once here and never updated.
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "insert"))]
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        id: Uuid,
        owner_id: Uuid,
        file_name: String,
        kind: DocumentKind,
        content_type: String,
        size_bytes: i64,
        storage_key: String,
        thumbnail_url: String,
    ) -> Result<Document, AppError> {
        let now = Utc::now();

        let document: Document = sqlx::query_as::<Postgres, Document>(
            r#"
            INSERT INTO documents (
                id, owner_id, file_name, kind, content_type, size_bytes,
                password_protected, status, storage_key, thumbnail_url,
                uploaded_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, 'pending', $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&file_name)
        .bind(kind)
        .bind(&content_type)
        .bind(size_bytes)
        .bind(&storage_key)
        .bind(&thumbnail_url)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(document)
    }

    /// Fetch a record by id.
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.record_id = %id))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let document: Option<Document> =
            sqlx::query_as::<Postgres, Document>("SELECT * FROM documents WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(document)
    }

    /// All records for one owner, most recent upload first.
    #[tracing::instrument(skip(self), fields(db.table = "documents", owner_id = %owner_id))]
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Document>, AppError> {
        let documents: Vec<Document> = sqlx::query_as::<Postgres, Document>(
            "SELECT * FROM documents WHERE owner_id = $1 ORDER BY uploaded_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(documents)
    }

    /// All records across owners, most recent upload first (operator console).
    #[tracing::instrument(skip(self), fields(db.table = "documents"))]
    pub async fn list_all(&self) -> Result<Vec<Document>, AppError> {
        let documents: Vec<Document> =
            sqlx::query_as::<Postgres, Document>("SELECT * FROM documents ORDER BY uploaded_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(documents)
    }

    /// Move a record to `new_status`, enforcing the lifecycle transition
    /// table. Entering `ready` (including the idempotent `ready -> ready`
    /// refresh) issues fresh signed preview/download references with the
    /// given TTL. Returns `None` when the id is unknown.
    ///
    /// The UPDATE is guarded by the observed current status, so two
    /// operators racing on the same record cannot both win: the loser gets
    /// an `InvalidTransition` against the fresh status instead of silently
    /// overwriting.
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.record_id = %id, status = %new_status))]
    pub async fn update_status(
        &self,
        id: Uuid,
        new_status: DocumentStatus,
        signed_url_ttl: Duration,
    ) -> Result<Option<Document>, AppError> {
        let Some(current) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        validate_transition(current.status, new_status)?;

        let refs = if new_status == DocumentStatus::Ready {
            Some(self.issue_signed_refs(&current.storage_key, signed_url_ttl).await?)
        } else {
            None
        };

        let updated: Option<Document> = match refs {
            Some(refs) => {
                sqlx::query_as::<Postgres, Document>(
                    r#"
                    UPDATE documents
                    SET status = $3,
                        preview_url = $4,
                        preview_expires_at = $5,
                        download_url = $6,
                        download_expires_at = $7,
                        updated_at = NOW()
                    WHERE id = $1 AND status = $2
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(current.status)
                .bind(new_status)
                .bind(&refs.preview_url)
                .bind(refs.preview_expires_at)
                .bind(&refs.download_url)
                .bind(refs.download_expires_at)
                .fetch_optional(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<Postgres, Document>(
                    r#"
                    UPDATE documents
                    SET status = $3, updated_at = NOW()
                    WHERE id = $1 AND status = $2
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(current.status)
                .bind(new_status)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        match updated {
            Some(document) => Ok(Some(document)),
            // Lost a race: the row changed under us (or was deleted).
            None => match self.get_by_id(id).await? {
                None => Ok(None),
                Some(fresh) => Err(AppError::InvalidTransition {
                    from: fresh.status,
                    to: new_status,
                }),
            },
        }
    }

    /// Refresh the signed references of a `ready`/`completed` record without
    /// touching its status (used when a stored reference has expired).
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.record_id = %id))]
    pub async fn refresh_signed_refs(
        &self,
        id: Uuid,
        storage_key: &str,
        signed_url_ttl: Duration,
    ) -> Result<Option<Document>, AppError> {
        let refs = self.issue_signed_refs(storage_key, signed_url_ttl).await?;

        let updated: Option<Document> = sqlx::query_as::<Postgres, Document>(
            r#"
            UPDATE documents
            SET preview_url = $2,
                preview_expires_at = $3,
                download_url = $4,
                download_expires_at = $5,
                updated_at = NOW()
            WHERE id = $1 AND status IN ('ready', 'completed')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&refs.preview_url)
        .bind(refs.preview_expires_at)
        .bind(&refs.download_url)
        .bind(refs.download_expires_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Record the metadata of a replaced blob (operator substituted the
    /// decrypted file). The storage key and filename do not change.
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.record_id = %id))]
    pub async fn record_replacement(
        &self,
        id: Uuid,
        content_type: &str,
        size_bytes: i64,
    ) -> Result<Option<Document>, AppError> {
        let updated: Option<Document> = sqlx::query_as::<Postgres, Document>(
            r#"
            UPDATE documents
            SET content_type = $2, size_bytes = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(content_type)
        .bind(size_bytes)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Remove a record. Returns whether a row was actually removed. Blob
    /// deletion is the caller's responsibility (best-effort, see handlers).
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.record_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn issue_signed_refs(
        &self,
        storage_key: &str,
        ttl: Duration,
    ) -> Result<SignedRefs, AppError> {
        let expires_at = Utc::now() + chrono::Duration::seconds(ttl.as_secs() as i64);

        let preview_url = self
            .storage
            .signed_url(storage_key, ttl)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to sign preview URL: {}", e)))?;
        let download_url = self
            .storage
            .signed_url(storage_key, ttl)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to sign download URL: {}", e)))?;

        Ok(SignedRefs {
            preview_url,
            preview_expires_at: expires_at,
            download_url,
            download_expires_at: expires_at,
        })
    }
}
