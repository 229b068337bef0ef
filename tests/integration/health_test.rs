//! Integration tests for the health passthrough and fallback routes.

mod helpers;

use axum::http::{Method, StatusCode};
use serde_json::Value;

use helpers::TestApp;

#[tokio::test]
async fn test_health_passes_status_through() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "pass");
}

#[tokio::test]
async fn test_health_accepts_post() {
    let app = TestApp::new();
    let (status, _) = app.request(Method::POST, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_failure_is_plain_text() {
    let app = TestApp::new();
    app.store.fail_health("platform unreachable").await;

    let (status, body) = app.request(Method::GET, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, "Error: platform unreachable");
}

#[tokio::test]
async fn test_other_paths_are_acknowledged() {
    let app = TestApp::new();

    for (method, uri) in [
        (Method::GET, "/"),
        (Method::POST, "/ping"),
        (Method::PATCH, "/cleanup/extra"),
    ] {
        let (status, body) = app.request(method, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Yay! Your function executed successfully!");
    }
}
