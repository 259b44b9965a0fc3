//! Unseal Database Library
//!
//! sqlx/Postgres repositories for document records and purchase
//! entitlements. Schema lives in the workspace `migrations/` directory and
//! is applied at API startup.

pub mod db;

pub use db::document::DocumentRepository;
pub use db::purchase::PurchaseRepository;
