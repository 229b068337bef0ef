//! Integration tests for the cleanup route over the Appwrite REST provider.

mod helpers;

use axum::http::{Method, StatusCode};
use chrono::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use filesweep_core::config::AppConfig;
use filesweep_storage::BackendManager;
use filesweep_storage::providers::MemoryStore;

use helpers::{BUCKET, COLLECTION, DATABASE, TestApp, record_aged, test_config};

fn documents_path() -> String {
    format!("/v1/databases/{DATABASE}/collections/{COLLECTION}/documents")
}

fn appwrite_config(server: &MockServer) -> AppConfig {
    let mut config = test_config();
    config.appwrite.endpoint = format!("{}/v1", server.uri());
    config.appwrite.project_id = "proj".into();
    config
}

async fn appwrite_app(server: &MockServer) -> TestApp {
    let config = appwrite_config(server);
    let backends = BackendManager::from_config(&config).await.unwrap();
    TestApp::with_backends(config, backends, MemoryStore::new())
}

/// Serve one page holding an expired `a` and a fresh `b`.
async fn mount_listing(server: &MockServer) {
    let documents = vec![
        serde_json::to_value(record_aged("a", Duration::hours(7))).unwrap(),
        serde_json::to_value(record_aged("b", Duration::hours(1))).unwrap(),
    ];
    Mock::given(method("GET"))
        .and(path(documents_path()))
        .and(header("X-Appwrite-Project", "proj"))
        .and(header("X-Appwrite-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total": 2,
            "documents": documents
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_appwrite_cleanup_deletes_expired() {
    let server = MockServer::start().await;
    mount_listing(&server).await;
    Mock::given(method("DELETE"))
        .and(path(format!("/v1/storage/buckets/{BUCKET}/files/a")))
        .and(header("X-Appwrite-Key", "test-key"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/a", documents_path())))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let app = appwrite_app(&server).await;
    let (status, body) = app.request(Method::GET, "/cleanup").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "File: a - Deleted\n");
}

#[tokio::test]
async fn test_appwrite_file_error_is_reported_verbatim() {
    let server = MockServer::start().await;
    mount_listing(&server).await;
    Mock::given(method("DELETE"))
        .and(path(format!("/v1/storage/buckets/{BUCKET}/files/a")))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "The requested file could not be found.",
            "code": 404,
            "type": "storage_file_not_found"
        })))
        .expect(1)
        .mount(&server)
        .await;
    // The entry stays when its file could not be deleted.
    Mock::given(method("DELETE"))
        .and(path(format!("{}/a", documents_path())))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let app = appwrite_app(&server).await;
    let (status, body) = app.request(Method::POST, "/cleanup").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "Error deleting file: a - The requested file could not be found.\n"
    );
}

#[tokio::test]
async fn test_appwrite_listing_rejection_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(documents_path()))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "The current user is not authorized to perform the requested action.",
            "code": 401,
            "type": "general_unauthorized_scope"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let app = appwrite_app(&server).await;
    let (status, body) = app.request(Method::GET, "/cleanup").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        "Error: The current user is not authorized to perform the requested action."
    );
}
