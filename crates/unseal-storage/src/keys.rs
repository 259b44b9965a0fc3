//! Shared key generation for storage backends.
//!
//! Key format: `documents/{owner_id}/{document_id}.{ext}`. All backends must
//! use this format for consistency.

use uuid::Uuid;

/// Generate a storage key for a document blob.
///
/// The extension is lowercased; an empty extension yields a key without a
/// trailing dot.
pub fn generate_storage_key(owner_id: Uuid, document_id: Uuid, extension: &str) -> String {
    let extension = extension.trim_start_matches('.').to_lowercase();
    if extension.is_empty() {
        format!("documents/{}/{}", owner_id, document_id)
    } else {
        format!("documents/{}/{}.{}", owner_id, document_id, extension)
    }
}
