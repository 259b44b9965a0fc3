//! OpenAPI documentation.
//! API version is in `crate::constants::API_VERSION`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use unseal_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Unseal API",
        version = "0.1.0",
        description = "Document unlock service (v0): upload password-protected documents, operator-driven decryption lifecycle, and pay-per-document access to the decrypted file. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::document_upload::upload_document,
        handlers::document_get::get_document,
        handlers::document_get::list_documents,
        handlers::document_download::download_document,
        handlers::unlock::unlock_document,
        handlers::document_status::update_document_status,
        handlers::document_replace::replace_document_file,
        handlers::document_delete::delete_document,
        handlers::operator::list_all_documents,
    ),
    components(schemas(
        models::DocumentResponse,
        models::DocumentStatus,
        models::DocumentKind,
        models::PurchaseResponse,
        handlers::document_download::DownloadResponse,
        handlers::unlock::UnlockResponse,
        handlers::document_status::UpdateStatusRequest,
        handlers::operator::OperatorDocumentResponse,
        handlers::operator::OperatorConsoleResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "documents", description = "Upload, listing, unlock, and download"),
        (name = "operator", description = "Operator console and lifecycle management")
    )
)]
pub struct ApiDoc;

/// Returns the generated OpenAPI spec.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
