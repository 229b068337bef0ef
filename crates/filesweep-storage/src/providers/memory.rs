//! In-memory object and metadata store.
//!
//! Used by tests and for exercising the cleanup engine without a backend.
//! Supports injected failures and per-object delays, and records how many
//! deletion calls were made and how many ran at the same time.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use filesweep_core::error::AppError;
use filesweep_core::result::AppResult;
use filesweep_core::traits::{HealthProbe, MetadataStore, ObjectStore};
use filesweep_core::types::FileRecord;

#[derive(Debug, Default)]
struct MemoryState {
    /// (database, collection) → id → record.
    records: HashMap<(String, String), BTreeMap<String, FileRecord>>,
    /// (bucket, object id).
    objects: HashSet<(String, String)>,
    object_failures: HashMap<String, String>,
    record_failures: HashMap<String, String>,
    list_failure: Option<String>,
    health_failure: Option<String>,
    delays: HashMap<String, Duration>,
    object_attempts: HashMap<String, usize>,
    record_attempts: HashMap<String, usize>,
}

/// Shared in-memory backend; clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

/// Decrements the in-flight gauge when a call finishes or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record and its object in `bucket_id`.
    pub async fn insert(&self, bucket_id: &str, record: FileRecord) {
        let mut state = self.state.lock().await;
        state
            .objects
            .insert((bucket_id.to_string(), record.storage_object_id().to_string()));
        state
            .records
            .entry((record.database_id.clone(), record.collection_id.clone()))
            .or_default()
            .insert(record.id.clone(), record);
    }

    /// Make object deletion for `object_id` fail with `message`.
    pub async fn fail_object_delete(&self, object_id: &str, message: &str) {
        let mut state = self.state.lock().await;
        state
            .object_failures
            .insert(object_id.to_string(), message.to_string());
    }

    /// Make record deletion for `record_id` fail with `message`.
    pub async fn fail_record_delete(&self, record_id: &str, message: &str) {
        let mut state = self.state.lock().await;
        state
            .record_failures
            .insert(record_id.to_string(), message.to_string());
    }

    /// Make every listing fail with `message`.
    pub async fn fail_listing(&self, message: &str) {
        self.state.lock().await.list_failure = Some(message.to_string());
    }

    /// Make the health probe fail with `message`.
    pub async fn fail_health(&self, message: &str) {
        self.state.lock().await.health_failure = Some(message.to_string());
    }

    /// Delay each deletion call for `id` by `delay`.
    pub async fn set_delay(&self, id: &str, delay: Duration) {
        self.state.lock().await.delays.insert(id.to_string(), delay);
    }

    /// Whether the object still exists.
    pub async fn has_object(&self, bucket_id: &str, object_id: &str) -> bool {
        let state = self.state.lock().await;
        state
            .objects
            .contains(&(bucket_id.to_string(), object_id.to_string()))
    }

    /// Whether a record with this ID exists in any collection.
    pub async fn has_record(&self, record_id: &str) -> bool {
        let state = self.state.lock().await;
        state.records.values().any(|c| c.contains_key(record_id))
    }

    /// Number of object deletions attempted for `object_id`.
    pub async fn object_delete_attempts(&self, object_id: &str) -> usize {
        let state = self.state.lock().await;
        state.object_attempts.get(object_id).copied().unwrap_or(0)
    }

    /// Number of record deletions attempted for `record_id`.
    pub async fn record_delete_attempts(&self, record_id: &str) -> usize {
        let state = self.state.lock().await;
        state.record_attempts.get(record_id).copied().unwrap_or(0)
    }

    /// Highest number of deletion calls observed running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn enter(&self) -> InFlight<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlight(&self.in_flight)
    }

    async fn pause(&self, id: &str) {
        let delay = self.state.lock().await.delays.get(id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn delete_object(&self, bucket_id: &str, object_id: &str) -> AppResult<()> {
        let _guard = self.enter();
        self.pause(object_id).await;

        let mut state = self.state.lock().await;
        *state
            .object_attempts
            .entry(object_id.to_string())
            .or_default() += 1;
        if let Some(message) = state.object_failures.get(object_id) {
            return Err(AppError::storage(message.clone()));
        }
        if !state
            .objects
            .remove(&(bucket_id.to_string(), object_id.to_string()))
        {
            return Err(AppError::not_found(
                "The requested file could not be found.",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn list_records(
        &self,
        database_id: &str,
        collection_id: &str,
    ) -> AppResult<Vec<FileRecord>> {
        let state = self.state.lock().await;
        if let Some(message) = &state.list_failure {
            return Err(AppError::external(message.clone()));
        }
        Ok(state
            .records
            .get(&(database_id.to_string(), collection_id.to_string()))
            .map(|c| c.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete_record(
        &self,
        database_id: &str,
        collection_id: &str,
        record_id: &str,
    ) -> AppResult<()> {
        let _guard = self.enter();
        self.pause(record_id).await;

        let mut state = self.state.lock().await;
        *state
            .record_attempts
            .entry(record_id.to_string())
            .or_default() += 1;
        if let Some(message) = state.record_failures.get(record_id) {
            return Err(AppError::database(message.clone()));
        }
        let removed = state
            .records
            .get_mut(&(database_id.to_string(), collection_id.to_string()))
            .and_then(|c| c.remove(record_id));
        if removed.is_none() {
            return Err(AppError::not_found(
                "Document with the requested ID could not be found.",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl HealthProbe for MemoryStore {
    async fn health(&self) -> AppResult<serde_json::Value> {
        match &self.state.lock().await.health_failure {
            Some(message) => Err(AppError::service_unavailable(message.clone())),
            None => Ok(serde_json::json!({"status": "pass", "provider": "memory"})),
        }
    }
}
