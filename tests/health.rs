mod common;

use axum::{
    body::{Body, to_bytes},
    extract::State,
    http::{Request, StatusCode},
};
use pricehawk_api::{
    app::build_app,
    routes::{doc::ApiDoc, health::health_check},
};
use tower::ServiceExt;
use utoipa::OpenApi;

#[tokio::test]
async fn health_check_reports_in_memory_backends() {
    let state = common::state().await;
    let response = health_check(State(state)).await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.storage, "memory");
    assert_eq!(data.catalog, "bundled");
    assert_eq!(data.comparison, "mock");
}

#[tokio::test]
async fn router_serves_health_with_a_request_id() {
    let app = build_app(common::state().await);

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn unknown_paths_get_the_json_not_found_envelope() {
    let app = build_app(common::state().await);

    let response = app
        .oneshot(Request::get("/nowhere").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(json["message"], "Not Found");
    assert_eq!(json["data"]["path"], "/nowhere");
}

#[tokio::test]
async fn export_route_sends_a_csv_attachment() {
    let app = build_app(common::state().await);

    let response = app
        .oneshot(
            Request::get("/api/products/export?status=same")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"price-comparison_"));

    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let csv = String::from_utf8(body.to_vec()).expect("utf-8");
    // header plus the two catalog products priced the same
    assert_eq!(csv.matches("\r\n").count(), 3);
}

#[test]
fn openapi_document_lists_every_route_group() {
    let doc = ApiDoc::openapi();
    for path in [
        "/health",
        "/api/products",
        "/api/products/export",
        "/api/catalog/products/{id}",
        "/api/validation/{product_id}/{matched_id}",
        "/api/manual-products/{id}",
        "/api/comparison/manual",
        "/api/wizard/{id}/confirm",
    ] {
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
