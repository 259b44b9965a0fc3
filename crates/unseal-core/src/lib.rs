//! Unseal Core Library
//!
//! This crate provides the domain models, lifecycle state machine, file
//! validation, error types, and configuration shared across all Unseal
//! components.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use lifecycle::validate_transition;
pub use storage_types::StorageBackend;
