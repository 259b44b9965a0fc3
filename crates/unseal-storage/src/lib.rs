//! Unseal Storage Library
//!
//! Storage abstraction and implementations for document blobs. Includes the
//! `Storage` trait, an S3-compatible backend (with presigned retrieval URLs)
//! and a local filesystem backend for development and tests.
//!
//! # Storage key format
//!
//! All backends use the same key layout: `documents/{owner_id}/{document_id}.{ext}`.
//! Keys must not contain `..` or a leading `/`. Key generation is centralized
//! in the `keys` module so backends stay consistent.

pub mod factory;
pub mod keys;
pub mod local;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::generate_storage_key;
pub use local::LocalStorage;
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use unseal_core::StorageBackend;
