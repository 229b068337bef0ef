//! Deletion fan-out engine.
//!
//! Every expired record becomes one unit of work: delete the object, then
//! delete the record. Units run on the tokio runtime behind a semaphore and
//! each returns its own [`Outcome`]; outcomes land in a slot per input index
//! once the join barrier is passed, so the report follows input order and
//! always has exactly one line per record.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use filesweep_core::error::AppError;
use filesweep_core::result::AppResult;
use filesweep_core::traits::{MetadataStore, ObjectStore};
use filesweep_core::types::FileRecord;
use filesweep_storage::Backend;

use crate::report::Outcome;

/// Error text for a unit stopped by cancellation.
pub const CANCELLED: &str = "cleanup cancelled";
/// Error text for a unit stopped by the run deadline.
pub const DEADLINE_EXCEEDED: &str = "cleanup deadline exceeded";
/// Error text for a unit whose task panicked.
pub const UNIT_PANICKED: &str = "unit panicked";

/// Stop conditions shared by every unit of one run.
#[derive(Debug, Clone)]
struct StopSignal {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl StopSignal {
    /// Resolves once the run is cancelled or past its deadline.
    async fn stopped(&self) {
        match self.deadline {
            Some(at) => {
                tokio::select! {
                    _ = self.cancel.cancelled() => {}
                    _ = tokio::time::sleep_until(at) => {}
                }
            }
            None => self.cancel.cancelled().await,
        }
    }

    /// Error describing why the run stopped.
    fn reason(&self) -> AppError {
        if self.cancel.is_cancelled() {
            AppError::cancelled(CANCELLED)
        } else {
            AppError::timeout(DEADLINE_EXCEEDED)
        }
    }

    /// Run one store call unless the run stops first.
    async fn guard<T>(&self, call: impl Future<Output = AppResult<T>>) -> AppResult<T> {
        tokio::select! {
            biased;
            _ = self.stopped() => Err(self.reason()),
            result = call => result,
        }
    }
}

/// Deletes expired records concurrently and collects one outcome each.
#[derive(Debug, Clone)]
pub struct DeletionEngine {
    /// Bucket holding the objects.
    bucket_id: String,
    /// Units in flight at most (0 = unbounded).
    max_concurrency: usize,
    /// Deadline for the whole batch.
    run_timeout: Option<Duration>,
}

impl DeletionEngine {
    /// Create an engine deleting objects from `bucket_id`.
    pub fn new(bucket_id: impl Into<String>, max_concurrency: usize) -> Self {
        Self {
            bucket_id: bucket_id.into(),
            max_concurrency,
            run_timeout: None,
        }
    }

    /// Set the deadline for a whole batch.
    pub fn with_run_timeout(mut self, run_timeout: Option<Duration>) -> Self {
        self.run_timeout = run_timeout;
        self
    }

    /// Bucket the objects are deleted from.
    pub fn bucket_id(&self) -> &str {
        &self.bucket_id
    }

    /// Delete every record in `expired` and return one outcome per record, in
    /// input order.
    ///
    /// Per-record failures never fail the batch. Records not yet started when
    /// `cancel` fires or the deadline passes get an object-delete failure;
    /// units already running fail at the step they were on.
    pub async fn run(
        &self,
        expired: Vec<FileRecord>,
        backend: &Backend,
        cancel: &CancellationToken,
    ) -> Vec<Outcome> {
        if expired.is_empty() {
            return Vec::new();
        }

        let limit = match self.max_concurrency {
            0 => Semaphore::MAX_PERMITS,
            n => n,
        };
        let stop = StopSignal {
            cancel: cancel.clone(),
            deadline: self.run_timeout.map(|t| Instant::now() + t),
        };

        info!(
            records = expired.len(),
            max_concurrency = self.max_concurrency,
            bucket_id = %self.bucket_id,
            "Deleting expired records"
        );

        let ids: Vec<String> = expired.iter().map(|r| r.id.clone()).collect();
        let mut slots: Vec<Option<Outcome>> = vec![None; expired.len()];
        let semaphore = Arc::new(Semaphore::new(limit));
        let mut units = JoinSet::new();

        for (index, record) in expired.into_iter().enumerate() {
            let permit = tokio::select! {
                biased;
                _ = stop.stopped() => None,
                permit = Arc::clone(&semaphore).acquire_owned() => permit.ok(),
            };
            let Some(permit) = permit else {
                let reason = stop.reason();
                slots[index] = Some(Outcome::object_failed(record.id, &reason.message));
                continue;
            };

            let bucket_id = self.bucket_id.clone();
            let objects = Arc::clone(&backend.objects);
            let metadata = Arc::clone(&backend.metadata);
            let stop = stop.clone();
            units.spawn(async move {
                let _permit = permit;
                let outcome =
                    delete_one(&record, &bucket_id, objects.as_ref(), metadata.as_ref(), &stop)
                        .await;
                (index, outcome)
            });
        }

        while let Some(joined) = units.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => error!(error = %e, "Deletion unit did not complete"),
            }
        }

        slots
            .into_iter()
            .zip(ids)
            .map(|(slot, id)| slot.unwrap_or_else(|| Outcome::object_failed(id, UNIT_PANICKED)))
            .collect()
    }
}

/// One unit: object first, record only if the object is gone.
async fn delete_one(
    record: &FileRecord,
    bucket_id: &str,
    objects: &dyn ObjectStore,
    metadata: &dyn MetadataStore,
    stop: &StopSignal,
) -> Outcome {
    let object_id = record.storage_object_id();
    if let Err(e) = stop.guard(objects.delete_object(bucket_id, object_id)).await {
        warn!(record_id = %record.id, error = %e, "Failed to delete file");
        return Outcome::object_failed(record.id.clone(), &e.message);
    }

    if let Err(e) = stop
        .guard(metadata.delete_record(&record.database_id, &record.collection_id, &record.id))
        .await
    {
        warn!(record_id = %record.id, error = %e, "File deleted but its entry remains");
        return Outcome::record_failed(record.id.clone(), &e.message);
    }

    debug!(record_id = %record.id, "Deleted file and entry");
    Outcome::Deleted {
        id: record.id.clone(),
    }
}
