//! Lifecycle transition integration tests.
//!
//! Run with: `cargo test -p unseal-api --test lifecycle_test`
//! (skipped unless `TEST_DATABASE_URL` points at a Postgres instance).

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::auth::{test_operator, test_user};
use helpers::{try_setup_test_app, upload_test_pdf, TestApp};
use serde_json::json;

async fn put_status(app: &TestApp, token: &str, id: uuid::Uuid, status: &str) -> axum_test::TestResponse {
    app.client()
        .put(&format!("/api/v0/documents/{}/status", id))
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "status": status }))
        .await
}

#[tokio::test]
async fn test_full_forward_lifecycle() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let operator = test_operator();
    let id = upload_test_pdf(&app, &owner.token).await;

    let response = put_status(&app, &operator.token, id, "processing").await;
    assert_eq!(response.status_code(), 200, "{}", response.text());
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "processing");
    assert!(body["preview_url"].is_null());

    let response = put_status(&app, &operator.token, id, "ready").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ready");
    // Entering ready issues both signed references.
    assert!(body["preview_url"].as_str().is_some());
    assert!(body["download_url"].as_str().is_some());

    let response = put_status(&app, &operator.token, id, "completed").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "completed");
}

#[tokio::test]
async fn test_pending_to_ready_skips_processing() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let operator = test_operator();
    let id = upload_test_pdf(&app, &owner.token).await;

    let response = put_status(&app, &operator.token, id, "ready").await;
    assert_eq!(response.status_code(), 200, "{}", response.text());
}

#[tokio::test]
async fn test_backward_moves_are_conflicts() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let operator = test_operator();
    let id = upload_test_pdf(&app, &owner.token).await;

    put_status(&app, &operator.token, id, "ready").await;
    put_status(&app, &operator.token, id, "completed").await;

    for target in ["pending", "processing", "ready"] {
        let response = put_status(&app, &operator.token, id, target).await;
        assert_eq!(response.status_code(), 409, "completed -> {}", target);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "INVALID_TRANSITION");
    }
}

#[tokio::test]
async fn test_ready_refresh_is_idempotent() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let operator = test_operator();
    let id = upload_test_pdf(&app, &owner.token).await;

    put_status(&app, &operator.token, id, "ready").await;
    let response = put_status(&app, &operator.token, id, "ready").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ready");
    assert!(body["download_url"].as_str().is_some());
}

#[tokio::test]
async fn test_unknown_status_word_is_400() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let operator = test_operator();
    let id = upload_test_pdf(&app, &owner.token).await;

    let response = put_status(&app, &operator.token, id, "archived").await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_non_operator_cannot_transition() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let id = upload_test_pdf(&app, &owner.token).await;

    let response = put_status(&app, &owner.token, id, "ready").await;
    assert_eq!(response.status_code(), 403);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_transition_on_unknown_id_is_404() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let operator = test_operator();

    let response = put_status(&app, &operator.token, uuid::Uuid::new_v4(), "ready").await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_operator_replaces_file_then_flips_ready() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let operator = test_operator();
    let id = upload_test_pdf(&app, &owner.token).await;

    let part = Part::bytes(vec![b'd'; 4096])
        .file_name("report.pdf")
        .mime_type("application/pdf");
    let form = MultipartForm::new().add_part("file", part);

    let response = app
        .client()
        .post(&format!("/api/v0/documents/{}/file", id))
        .add_header("Authorization", format!("Bearer {}", operator.token))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());
    let body: serde_json::Value = response.json();
    assert_eq!(body["size_bytes"], 4096);

    let response = put_status(&app, &operator.token, id, "ready").await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_operator_console_lists_all_with_poll_interval() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let operator = test_operator();
    let id = upload_test_pdf(&app, &owner.token).await;

    let response = app
        .client()
        .get("/api/v0/admin/documents")
        .add_header("Authorization", format!("Bearer {}", operator.token))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["poll_interval_secs"].as_u64(),
        Some(app.state.config.operator_poll_interval_secs)
    );
    let documents = body["documents"].as_array().expect("documents array");
    let row = documents
        .iter()
        .find(|d| d["id"].as_str() == Some(&id.to_string()))
        .expect("uploaded document listed");
    assert_eq!(row["stale"], false);
    assert_eq!(row["owner_id"].as_str(), Some(owner.user_id.to_string().as_str()));

    // Regular users are locked out of the console.
    let response = app
        .client()
        .get("/api/v0/admin/documents")
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .await;
    assert_eq!(response.status_code(), 403);
}
