//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait so
/// the document repository and handlers never couple to a concrete backend.
///
/// **Key format:** `documents/{owner_id}/{document_id}.{ext}`; see the crate
/// root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload a new document blob and return its storage key.
    ///
    /// Callers must hold an authenticated owner before uploading; the HTTP
    /// layer enforces this, the backend only derives the key.
    async fn put(
        &self,
        owner_id: Uuid,
        document_id: Uuid,
        extension: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String>;

    /// Overwrite an existing blob in place (operator substitutes the
    /// decrypted file for the original). The key does not change.
    async fn replace(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<()>;

    /// Download a blob by its storage key.
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a blob by its storage key.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Generate a time-limited retrieval URL granting read access without
    /// further authentication.
    async fn signed_url(&self, storage_key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Check if a blob exists.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
