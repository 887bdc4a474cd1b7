//! Integration tests for the health endpoint.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_returns_200_with_status_ok() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path()).await;

    let (status, json) = common::get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["books"], 1);
    assert_eq!(json["assistantBusy"], false);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path()).await;

    let (status, _) = common::get_json(app, "/api/v1/nonexistent").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
