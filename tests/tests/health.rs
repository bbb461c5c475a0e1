//! Tests for health check endpoints.
//!
//! The health registry is process-wide, so tests that change it run their
//! steps in sequence inside one test.

use axum::http::StatusCode;
use integration_tests::setup::{call, TestContext};
use serde_json::json;
use telemetry::health;

/// Test /health endpoint returns proper structure
#[tokio::test]
async fn test_health_endpoint_structure() {
    let ctx = TestContext::new();
    let server = ctx.server();

    call(&server, "getCategories", json!({})).await;

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert!(body.get("status").is_some(), "Response should have 'status' field");
    assert!(body.get("fixtures_enabled").is_some());
    assert_eq!(body["store"], "mock");
    assert_eq!(body["components"][0]["name"], "sheets");

    let metrics = &body["metrics"];
    assert!(metrics["actionsDispatched"].as_u64().unwrap() >= 1);
    assert!(metrics["cacheHitRate"].as_f64().is_some());
}

/// Readiness follows the sheet, or the fixture fallback when enabled
#[tokio::test]
async fn test_readiness_follows_store_health() {
    let ctx = TestContext::new();
    let server = ctx.server();

    health().set_fixtures_enabled(false);
    health().sheets.set_healthy();
    server.get("/health/ready").await.assert_status_ok();
    let body: serde_json::Value = server.get("/health").await.json();
    assert_eq!(body["status"], "healthy");

    health().sheets.set_unhealthy("HTTP 403: forbidden");
    let response = server.get("/health/ready").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["sheets"], "HTTP 403: forbidden");
    let body: serde_json::Value = server.get("/health").await.json();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["components"][0]["message"], "HTTP 403: forbidden");

    health().set_fixtures_enabled(true);
    server.get("/health/ready").await.assert_status_ok();
    let body: serde_json::Value = server.get("/health").await.json();
    assert_eq!(body["status"], "degraded");

    health().set_fixtures_enabled(false);
    health().sheets.set_healthy();
}

/// Test /health/live endpoint always returns 200 when service is running
#[tokio::test]
async fn test_live_endpoint() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server.get("/health/live").await.assert_status_ok();
}
