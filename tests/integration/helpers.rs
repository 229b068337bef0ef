//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use chrono::{Duration, Utc};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use filesweep_core::config::AppConfig;
use filesweep_core::types::{FileRecord, format_created_at};
use filesweep_storage::BackendManager;
use filesweep_storage::providers::MemoryStore;

pub const DATABASE: &str = "main";
pub const COLLECTION: &str = "uploads";
pub const BUCKET: &str = "files";

/// Config pointing the cleanup at the test collection.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.cleanup.database_id = DATABASE.into();
    config.cleanup.collection_id = COLLECTION.into();
    config.cleanup.bucket_id = BUCKET.into();
    config
}

/// A record created `age` ago in the test collection.
pub fn record_aged(id: &str, age: Duration) -> FileRecord {
    FileRecord::new(id, format_created_at(Utc::now() - age), DATABASE, COLLECTION)
}

/// Test application over an in-memory backend
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store, for seeding and inspection
    pub store: MemoryStore,
    /// Shutdown token handed to the state
    pub shutdown: CancellationToken,
}

impl TestApp {
    /// Create a new test application with the default test config
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application with a custom config
    pub fn with_config(config: AppConfig) -> Self {
        let store = MemoryStore::new();
        Self::with_backends(config, BackendManager::shared(store.clone()), store)
    }

    /// Create a test application over configured backends; `store` is
    /// only used by the seeding helpers.
    pub fn with_backends(config: AppConfig, backends: BackendManager, store: MemoryStore) -> Self {
        let shutdown = CancellationToken::new();
        let state = filesweep_api::AppState::new(config, backends, shutdown.clone());
        Self {
            router: filesweep_api::build_app(state),
            store,
            shutdown,
        }
    }

    /// Seed a record and its object
    pub async fn seed(&self, id: &str, age: Duration) {
        self.store.insert(BUCKET, record_aged(id, age)).await;
    }

    /// Send a request and return status and body text
    pub async fn request(&self, method: Method, uri: &str) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("x-appwrite-key", "test-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }
}
