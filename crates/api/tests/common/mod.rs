#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use sunin_api::config::ServerConfig;
use sunin_api::router::build_app_router;
use sunin_api::state::AppState;
use sunin_core::{Calendar, Ledger};
use sunin_db::{MemoryStore, StorageBackend};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        storage: StorageBackend::Memory,
        utc_offset_minutes: 0,
        seed_demo_data: false,
    }
}

/// A ledger over a fresh in-memory store.
pub fn test_ledger() -> Arc<Ledger> {
    Arc::new(Ledger::new(Arc::new(MemoryStore::default()), Calendar::utc()))
}

/// Build the full application router (same middleware stack as production)
/// around `ledger`. Clone the `Arc` to issue several requests against one
/// store.
pub fn build_test_app(ledger: Arc<Ledger>) -> Router {
    build_app_router(AppState {
        ledger,
        config: Arc::new(test_config()),
    })
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

/// Send a raw (possibly malformed) JSON body.
pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a room through the API and return its id.
pub async fn create_room(ledger: &Arc<Ledger>, number: &str, price: i64) -> i64 {
    let response = post_json(
        build_test_app(ledger.clone()),
        "/api/rooms",
        serde_json::json!({"roomNumber": number, "type": "Standard", "price": price}),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
