mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde_json::json;
use tower::ServiceExt;

use common::{sample_invoice, setup_db};
use wholesale_sync::config::AppConfig;
use wholesale_sync::entities::prelude::Mutations;
use wholesale_sync::{router, AppState};

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        bind_address: "127.0.0.1:0".to_string(),
        source_base_url: "http://127.0.0.1:1/".to_string(),
        source_api_token: "test".to_string(),
        ledger_base_url: "http://127.0.0.1:1/".to_string(),
        ledger_subscription_key: "test".to_string(),
        ledger_access_token: "test".to_string(),
        carrier_base_url: "http://127.0.0.1:1/".to_string(),
        carrier_public_key: "test".to_string(),
        carrier_secret_key: "test".to_string(),
        default_shipping_method: None,
        webhook_secret: Some("s3cret".to_string()),
    }
}

async fn test_app() -> (axum::Router, DatabaseConnection) {
    let db = setup_db().await;
    let state = AppState::new(db.clone(), test_config());
    (router(state), db)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn wrong_secret_is_forbidden() {
    let (app, _db) = test_app().await;

    let body = json!({ "event": "invoice_create", "invoice": sample_invoice(1, 5) });
    let response = app
        .oneshot(post_json("/api/v1/invoices/webhook?secret=wrong", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_event_is_a_bad_request() {
    let (app, _db) = test_app().await;

    let body = json!({ "event": "invoice_archived", "invoice": sample_invoice(1, 5) });
    let response = app
        .oneshot(post_json("/api/v1/invoices/webhook?secret=s3cret", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_document_is_a_bad_request() {
    let (app, _db) = test_app().await;

    let body = json!({ "event": "invoice_create" });
    let response = app
        .oneshot(post_json("/api/v1/invoices/webhook?secret=s3cret", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn failed_sync_still_returns_ok() {
    let (app, db) = test_app().await;

    // Deleting a never-synchronized invoice fails fast (no remote id), but
    // the webhook must still acknowledge so the source does not retry.
    let body = json!({ "event": "invoice_delete", "invoice": sample_invoice(1, 5) });
    let response = app
        .oneshot(post_json("/api/v1/invoices/webhook?secret=s3cret", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let recorded = Mutations::find().all(&db).await.unwrap();
    assert_eq!(recorded.len(), 1);
    assert!(!recorded[0].success);
}
