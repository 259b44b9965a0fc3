//! Access gate integration tests: unlock purchases and gated downloads.
//!
//! Run with: `cargo test -p unseal-api --test unlock_test`
//! (skipped unless `TEST_DATABASE_URL` points at a Postgres instance).

mod helpers;

use helpers::auth::{test_operator, test_user};
use helpers::{try_setup_test_app, upload_test_pdf, TestApp};
use serde_json::json;

async fn make_ready(app: &TestApp, operator_token: &str, id: uuid::Uuid) {
    let response = app
        .client()
        .put(&format!("/api/v0/documents/{}/status", id))
        .add_header("Authorization", format!("Bearer {}", operator_token))
        .json(&json!({ "status": "ready" }))
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());
}

#[tokio::test]
async fn test_download_without_purchase_is_402() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let operator = test_operator();
    let id = upload_test_pdf(&app, &owner.token).await;
    make_ready(&app, &operator.token, id).await;

    let response = app
        .client()
        .get(&format!("/api/v0/documents/{}/download", id))
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .await;
    assert_eq!(response.status_code(), 402);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PAYMENT_REQUIRED");
}

#[tokio::test]
async fn test_unlock_then_download() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let operator = test_operator();
    let id = upload_test_pdf(&app, &owner.token).await;
    make_ready(&app, &operator.token, id).await;

    let response = app
        .client()
        .post(&format!("/api/v0/documents/{}/unlock", id))
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["purchase"]["amount_cents"].as_i64(),
        Some(app.state.config.unlock_price_cents as i64)
    );
    assert_eq!(body["document"]["unlocked"], true);
    assert!(body["document"]["preview_url"].as_str().is_some());

    let response = app
        .client()
        .get(&format!("/api/v0/documents/{}/download", id))
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    let url = body["download_url"].as_str().expect("signed download url");
    assert!(url.contains(&id.to_string()));
    assert!(body["expires_at"].as_str().is_some());
}

#[tokio::test]
async fn test_double_unlock_is_idempotent() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let operator = test_operator();
    let id = upload_test_pdf(&app, &owner.token).await;
    make_ready(&app, &operator.token, id).await;

    let first = app
        .client()
        .post(&format!("/api/v0/documents/{}/unlock", id))
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .await;
    assert_eq!(first.status_code(), 200);
    let first: serde_json::Value = first.json();

    let second = app
        .client()
        .post(&format!("/api/v0/documents/{}/unlock", id))
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .await;
    assert_eq!(second.status_code(), 200);
    let second: serde_json::Value = second.json();

    // Same purchase row both times; nothing was charged twice.
    assert_eq!(first["purchase"]["id"], second["purchase"]["id"]);
}

#[tokio::test]
async fn test_unlock_before_ready_is_rejected() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let id = upload_test_pdf(&app, &owner.token).await;

    let response = app
        .client()
        .post(&format!("/api/v0/documents/{}/unlock", id))
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_locked_record_withholds_signed_refs() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let operator = test_operator();
    let id = upload_test_pdf(&app, &owner.token).await;
    make_ready(&app, &operator.token, id).await;

    // References exist on the row but are withheld until purchase.
    let response = app
        .client()
        .get(&format!("/api/v0/documents/{}", id))
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["unlocked"], false);
    assert!(body["preview_url"].is_null());
    assert!(body["download_url"].is_null());
    assert!(body["thumbnail_url"].as_str().is_some());
}

#[tokio::test]
async fn test_unlock_entitlement_survives_relisting() {
    let Some(app) = try_setup_test_app().await else {
        return;
    };
    let owner = test_user();
    let operator = test_operator();
    let id = upload_test_pdf(&app, &owner.token).await;
    make_ready(&app, &operator.token, id).await;

    app.client()
        .post(&format!("/api/v0/documents/{}/unlock", id))
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .await;

    // The listing reflects the server-side entitlement on every request.
    let response = app
        .client()
        .get("/api/v0/documents")
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .await;
    let docs: Vec<serde_json::Value> = response.json();
    let doc = docs
        .iter()
        .find(|d| d["id"].as_str() == Some(&id.to_string()))
        .expect("document listed");
    assert_eq!(doc["unlocked"], true);
}
