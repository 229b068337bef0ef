//! Integration tests for the cleanup route and the local provider.

mod helpers;

use axum::http::{Method, StatusCode};
use bytes::Bytes;
use chrono::{Duration, Utc};
use tokio_util::sync::CancellationToken;

use filesweep_core::config::{InvalidTimestampPolicy, ProviderKind};
use filesweep_core::types::FileRecord;
use filesweep_storage::BackendManager;
use filesweep_storage::providers::LocalStore;
use filesweep_worker::CleanupService;

use helpers::{BUCKET, COLLECTION, DATABASE, TestApp, record_aged, test_config};

#[tokio::test]
async fn test_cleanup_deletes_only_expired() {
    let app = TestApp::new();
    app.seed("a", Duration::hours(7)).await;
    app.seed("b", Duration::hours(1)).await;

    let (status, body) = app.request(Method::GET, "/cleanup").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "File: a - Deleted\n");
    assert!(!app.store.has_record("a").await);
    assert!(app.store.has_record("b").await);
}

#[tokio::test]
async fn test_cleanup_with_nothing_expired() {
    let app = TestApp::new();
    app.seed("fresh", Duration::minutes(5)).await;

    let (status, body) = app.request(Method::POST, "/cleanup").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "No files to delete");
}

#[tokio::test]
async fn test_cleanup_reports_each_failure() {
    let app = TestApp::new();
    for id in ["a", "b", "c"] {
        app.seed(id, Duration::hours(10)).await;
    }
    app.store.fail_object_delete("b", "Storage bucket is locked").await;
    app.store.fail_record_delete("c", "Document is read-only").await;

    let (status, body) = app.request(Method::GET, "/cleanup").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "File: a - Deleted\n\
         Error deleting file: b - Storage bucket is locked\n\
         Error deleting file entry: c - Document is read-only\n"
    );
    assert_eq!(app.store.record_delete_attempts("b").await, 0);
    assert!(!app.store.has_object(BUCKET, "c").await);
    assert!(app.store.has_record("c").await);
}

#[tokio::test]
async fn test_listing_failure_is_fatal() {
    let app = TestApp::new();
    app.seed("a", Duration::hours(7)).await;
    app.store.fail_listing("Collection not reachable").await;

    let (status, body) = app.request(Method::GET, "/cleanup").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, "Error: Collection not reachable");
    assert!(app.store.has_record("a").await);
}

#[tokio::test]
async fn test_malformed_timestamp_aborts() {
    let app = TestApp::new();
    app.seed("a", Duration::hours(7)).await;
    app.store
        .insert(
            BUCKET,
            FileRecord::new("broken", "2024-13-45", DATABASE, COLLECTION),
        )
        .await;

    let (status, body) = app.request(Method::GET, "/cleanup").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.starts_with("Error: "));
    assert!(body.contains("2024-13-45"));
    assert_eq!(app.store.object_delete_attempts("a").await, 0);
}

#[tokio::test]
async fn test_skip_policy_keeps_malformed_records() {
    let mut config = test_config();
    config.cleanup.invalid_timestamp = InvalidTimestampPolicy::Skip;
    let app = TestApp::with_config(config);
    app.seed("a", Duration::hours(7)).await;
    app.store
        .insert(
            BUCKET,
            FileRecord::new("broken", "2024-13-45", DATABASE, COLLECTION),
        )
        .await;

    let (status, body) = app.request(Method::GET, "/cleanup").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "File: a - Deleted\n");
    assert!(app.store.has_record("broken").await);
}

#[tokio::test]
async fn test_shutdown_cancels_pending_units() {
    let app = TestApp::new();
    app.seed("a", Duration::hours(7)).await;
    app.shutdown.cancel();

    let (status, body) = app.request(Method::GET, "/cleanup").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, "Error: cleanup cancelled");
    assert!(app.store.has_record("a").await);
}

#[tokio::test]
async fn test_local_provider_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_str().unwrap().to_string();

    let mut config = test_config();
    config.cleanup.provider = ProviderKind::Local;
    config.local.root_path = root.clone();

    let store = LocalStore::new(&root).await.unwrap();
    for (id, age) in [("old", Duration::hours(30)), ("new", Duration::hours(2))] {
        store.put_record(&record_aged(id, age)).await.unwrap();
        store
            .put_object(BUCKET, id, Bytes::from_static(b"payload"))
            .await
            .unwrap();
    }
    store
        .put_record(&record_aged("lost", Duration::hours(30)))
        .await
        .unwrap();

    let backend = BackendManager::from_config(&config)
        .await
        .unwrap()
        .connect(None)
        .unwrap();
    let report = CleanupService::new(&config.cleanup)
        .run(&backend, Utc::now(), &CancellationToken::new())
        .await
        .unwrap();

    let lines: Vec<String> = report.outcomes.iter().map(ToString::to_string).collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Error deleting file: lost - "));
    assert_eq!(lines[1], "File: old - Deleted");

    assert!(!dir.path().join("buckets/files/old").exists());
    assert!(dir.path().join("buckets/files/new").exists());
    assert!(dir.path().join("databases/main/uploads/lost.json").exists());
    assert!(!dir.path().join("databases/main/uploads/old.json").exists());
}
