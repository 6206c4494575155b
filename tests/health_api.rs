//! Health, readiness and metrics endpoint tests

mod common;

use axum::http::{header, StatusCode};
use serde_json::json;

use common::app;

#[tokio::test]
async fn test_healthz() {
    let app = app().await;

    let response = app.get("/healthz/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"status": "ok", "service": "catalog-api"}));
}

#[tokio::test]
async fn test_readyz_connected() {
    let app = app().await;

    let response = app.get("/readyz/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"status": "ready", "database": "connected"}));
}

#[tokio::test]
async fn test_readyz_after_store_closed() {
    let app = app().await;
    app.store.close().await;

    let response = app.get("/readyz").await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    let body = response.json();
    assert_eq!(body["status"], "not ready");
    assert_eq!(body["database"], "disconnected");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_metrics_exposition() {
    let app = app().await;

    let response = app.get("/metrics/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain; version=0.0.4"));
    assert!(response.text.contains("# TYPE http_requests_total counter"));
    assert!(response.text.contains("# TYPE http_request_duration_seconds histogram"));
}

#[tokio::test]
async fn test_requests_are_counted_by_route_template() {
    let app = app().await;
    app.get("/api/v1/persons/").await;
    app.get("/api/v1/persons/").await;
    app.get("/api/v1/persons/7c9e6679-7425-40de-944b-e07fc1f90ae7/").await;

    let metrics = &app.state.metrics;
    assert_eq!(metrics.request_count("GET", "/api/v1/persons/", 200), 2);
    assert_eq!(metrics.request_count("GET", "/api/v1/persons/:id/", 404), 1);

    let text = app.get("/metrics/").await.text;
    assert!(text.contains(
        "http_requests_total{method=\"GET\",endpoint=\"/api/v1/persons/\",status=\"200\"} 2"
    ));
}
