//! HTTP-level tests for the settings singleton.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, patch_json, put_json, test_ledger};
use serde_json::json;

#[tokio::test]
async fn first_read_returns_defaults() {
    let ledger = test_ledger();
    let response = get(build_test_app(ledger.clone()), "/api/settings").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["hotelName"], "Sunin Hotel");
    assert_eq!(json["hotelAddress"], "Vientiane, Lao PDR");
    assert_eq!(json["hotelPhone"], "+856 20 1234 5678");
    assert_eq!(json["taxRate"], 0.0);
    assert!(json["hotelLogo"].is_null());

    // Defaults were persisted.
    assert!(ledger.snapshot().await.unwrap().settings.is_some());
}

#[tokio::test]
async fn patch_merges_fields() {
    let ledger = test_ledger();
    let response = patch_json(
        build_test_app(ledger.clone()),
        "/api/settings",
        json!({"hotelName": "Sunin Riverside", "taxRate": 10}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["hotelName"], "Sunin Riverside");
    assert_eq!(json["taxRate"], 10.0);
    assert_eq!(json["hotelAddress"], "Vientiane, Lao PDR");

    let response = put_json(
        build_test_app(ledger.clone()),
        "/api/settings",
        json!({"hotelLogo": "data:image/png;base64,AAAA"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(build_test_app(ledger), "/api/settings").await).await;
    assert_eq!(json["hotelName"], "Sunin Riverside");
    assert_eq!(json["hotelLogo"], "data:image/png;base64,AAAA");
}

#[tokio::test]
async fn out_of_range_tax_rate_returns_400() {
    let response = patch_json(
        build_test_app(test_ledger()),
        "/api/settings",
        json!({"taxRate": 150}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
