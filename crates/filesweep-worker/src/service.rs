//! Cleanup service: list, select, delete, report.

use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use filesweep_core::config::CleanupConfig;
use filesweep_core::error::AppError;
use filesweep_core::result::AppResult;
use filesweep_storage::Backend;

use crate::engine::{CANCELLED, DeletionEngine};
use crate::report::CleanupReport;
use crate::selector::{Selection, Selector};

/// Runs one cleanup pass against a backend.
#[derive(Debug, Clone)]
pub struct CleanupService {
    /// Database holding the records.
    database_id: String,
    /// Collection holding the records.
    collection_id: String,
    /// Age policy.
    selector: Selector,
    /// Concurrent deleter.
    engine: DeletionEngine,
}

impl CleanupService {
    /// Build the service from the cleanup section of the configuration.
    pub fn new(config: &CleanupConfig) -> Self {
        Self {
            database_id: config.database_id.clone(),
            collection_id: config.collection_id.clone(),
            // An unrepresentable window keeps everything.
            selector: Selector::new(
                config.retention().unwrap_or(chrono::TimeDelta::MAX),
                config.invalid_timestamp,
            ),
            engine: DeletionEngine::new(config.bucket_id.clone(), config.max_concurrency)
                .with_run_timeout(config.run_timeout()),
        }
    }

    /// List the collection and partition it at `now` without deleting.
    ///
    /// Fails on a listing error, or on a malformed timestamp under the abort
    /// policy.
    pub async fn expired(&self, backend: &Backend, now: DateTime<Utc>) -> AppResult<Selection> {
        let records = backend
            .metadata
            .list_records(&self.database_id, &self.collection_id)
            .await
            .map_err(|e| {
                error!(
                    database_id = %self.database_id,
                    collection_id = %self.collection_id,
                    error = %e,
                    "Failed to list file records"
                );
                e
            })?;
        self.selector.select(records, now)
    }

    /// Run one full cleanup pass.
    ///
    /// Listing and timestamp failures are fatal and nothing is deleted.
    /// Per-record failures are part of the report.
    pub async fn run(
        &self,
        backend: &Backend,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> AppResult<CleanupReport> {
        let started = Instant::now();

        let selection = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AppError::cancelled(CANCELLED)),
            selection = self.expired(backend, now) => selection?,
        };
        let listed = selection.expired.len() + selection.retained;

        info!(
            listed,
            expired = selection.expired.len(),
            retention_hours = self.selector.threshold().num_hours(),
            "Cleanup run started"
        );

        let outcomes = self.engine.run(selection.expired, backend, cancel).await;
        let report = CleanupReport {
            listed,
            unparsable: selection.unparsable,
            outcomes,
            elapsed: started.elapsed(),
        };

        let orphaned = report.orphaned_records();
        if !orphaned.is_empty() {
            warn!(
                count = orphaned.len(),
                record_ids = ?orphaned,
                "Entries left behind after their files were deleted"
            );
        }

        info!(
            deleted = report.deleted(),
            failed = report.failed(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Cleanup run finished"
        );
        Ok(report)
    }
}
