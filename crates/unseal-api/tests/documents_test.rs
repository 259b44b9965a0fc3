//! Document upload/listing/deletion integration tests.
//!
//! Run with: `cargo test -p unseal-api --test documents_test`
//! (skipped unless `TEST_DATABASE_URL` points at a Postgres instance).

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::auth::{test_operator, test_user};
use helpers::{try_setup_test_app, upload_test_pdf};

#[tokio::test]
async fn test_upload_pdf_creates_pending_document() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let user = test_user();

    let part = Part::bytes(vec![b'x'; 2_097_152])
        .file_name("report.pdf")
        .mime_type("application/pdf");
    let form = MultipartForm::new().add_part("file", part);

    let response = app
        .client()
        .post("/api/v0/documents")
        .add_header("Authorization", format!("Bearer {}", user.token))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["kind"], "pdf");
    assert_eq!(body["size_bytes"], 2_097_152);
    assert_eq!(body["file_name"], "report.pdf");
    assert_eq!(body["password_protected"], true);
    assert_eq!(body["unlocked"], false);
    assert!(body["preview_url"].is_null());
    assert!(body["download_url"].is_null());
    assert!(body["thumbnail_url"].as_str().is_some());
}

#[tokio::test]
async fn test_oversized_upload_rejected_without_record() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let user = test_user();

    let part = Part::bytes(vec![0u8; 26 * 1024 * 1024])
        .file_name("huge.pdf")
        .mime_type("application/pdf");
    let form = MultipartForm::new().add_part("file", part);

    let response = app
        .client()
        .post("/api/v0/documents")
        .add_header("Authorization", format!("Bearer {}", user.token))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 413);

    // No record was created for the rejected upload.
    let listing = app
        .client()
        .get("/api/v0/documents")
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    let docs: Vec<serde_json::Value> = listing.json();
    assert!(docs.is_empty());
}

#[tokio::test]
async fn test_disallowed_media_type_rejected() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let user = test_user();

    let part = Part::bytes(vec![0u8; 512])
        .file_name("photo.png")
        .mime_type("image/png");
    let form = MultipartForm::new().add_part("file", part);

    let response = app
        .client()
        .post("/api/v0/documents")
        .add_header("Authorization", format!("Bearer {}", user.token))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 400);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_listing_is_owner_scoped() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let other = test_user();

    let document_id = upload_test_pdf(&app, &owner.token).await;

    let own_listing = app
        .client()
        .get("/api/v0/documents")
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .await;
    let docs: Vec<serde_json::Value> = own_listing.json();
    assert!(docs
        .iter()
        .any(|d| d["id"].as_str() == Some(&document_id.to_string())));

    let other_listing = app
        .client()
        .get("/api/v0/documents")
        .add_header("Authorization", format!("Bearer {}", other.token))
        .await;
    let docs: Vec<serde_json::Value> = other_listing.json();
    assert!(docs.is_empty());

    // Foreign records are indistinguishable from missing ones.
    let response = app
        .client()
        .get(&format!("/api/v0/documents/{}", document_id))
        .add_header("Authorization", format!("Bearer {}", other.token))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_unknown_id_returns_404() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let user = test_user();
    let unknown = uuid::Uuid::new_v4();

    for path in [
        format!("/api/v0/documents/{}", unknown),
        format!("/api/v0/documents/{}/download", unknown),
    ] {
        let response = app
            .client()
            .get(&path)
            .add_header("Authorization", format!("Bearer {}", user.token))
            .await;
        assert_eq!(response.status_code(), 404, "{}", path);
    }

    let response = app
        .client()
        .post(&format!("/api/v0/documents/{}/unlock", unknown))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_requests_without_token_are_401() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };

    let response = app.client().get("/api/v0/documents").await;
    assert_eq!(response.status_code(), 401);

    let response = app
        .client()
        .get("/api/v0/documents")
        .add_header("Authorization", "Bearer not-a-jwt")
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_operator_delete_removes_record() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let operator = test_operator();

    let document_id = upload_test_pdf(&app, &owner.token).await;

    // Owners cannot delete.
    let response = app
        .client()
        .delete(&format!("/api/v0/documents/{}", document_id))
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .await;
    assert_eq!(response.status_code(), 403);

    let response = app
        .client()
        .delete(&format!("/api/v0/documents/{}", document_id))
        .add_header("Authorization", format!("Bearer {}", operator.token))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = app
        .client()
        .get(&format!("/api/v0/documents/{}", document_id))
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .await;
    assert_eq!(response.status_code(), 404);

    // Deleting again is a 404, not an error.
    let response = app
        .client()
        .delete(&format!("/api/v0/documents/{}", document_id))
        .add_header("Authorization", format!("Bearer {}", operator.token))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_delete_survives_missing_blob() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let operator = test_operator();

    let document_id = upload_test_pdf(&app, &owner.token).await;

    // Remove the blob out-of-band so the handler's own blob delete fails.
    let document = app
        .state
        .documents
        .get_by_id(document_id)
        .await
        .expect("fetch document")
        .expect("document exists");
    app.state
        .storage
        .delete(&document.storage_key)
        .await
        .expect("remove blob");

    let response = app
        .client()
        .delete(&format!("/api/v0/documents/{}", document_id))
        .add_header("Authorization", format!("Bearer {}", operator.token))
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());

    let listing = app
        .client()
        .get("/api/v0/documents")
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .await;
    let docs: Vec<serde_json::Value> = listing.json();
    assert!(docs.is_empty());
}

#[tokio::test]
async fn test_health_is_public() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}
