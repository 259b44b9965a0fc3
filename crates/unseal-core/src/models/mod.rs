pub mod document;
pub mod purchase;

pub use document::{Document, DocumentKind, DocumentResponse, DocumentStatus, SignedRefs};
pub use purchase::{Purchase, PurchaseResponse};
