//! Scheduled cleanup job.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use filesweep_core::result::AppResult;
use filesweep_storage::BackendManager;

use crate::report::CleanupReport;
use crate::service::CleanupService;

/// Runs the cleanup service on each scheduler tick, one run at a time.
#[derive(Debug, Clone)]
pub struct CleanupJob {
    /// Cleanup service
    service: Arc<CleanupService>,
    /// Backend factory; scheduled runs use the configured API key
    backends: BackendManager,
    /// Held while a run is in flight
    running: Arc<Mutex<()>>,
    /// Cancels in-flight runs on shutdown
    cancel: CancellationToken,
}

impl CleanupJob {
    /// Create a new cleanup job
    pub fn new(
        service: Arc<CleanupService>,
        backends: BackendManager,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            service,
            backends,
            running: Arc::new(Mutex::new(())),
            cancel,
        }
    }

    /// Run one pass unless a previous pass is still running.
    ///
    /// Returns `None` when the tick was skipped.
    pub async fn run_once(&self) -> Option<AppResult<CleanupReport>> {
        let Ok(_running) = self.running.try_lock() else {
            debug!("Previous cleanup still running, skipping tick");
            return None;
        };
        if self.cancel.is_cancelled() {
            debug!("Shutting down, skipping cleanup tick");
            return None;
        }

        let result = match self.backends.connect(None) {
            Ok(backend) => self.service.run(&backend, Utc::now(), &self.cancel).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(report) => info!(
                deleted = report.deleted(),
                failed = report.failed(),
                "Scheduled cleanup completed"
            ),
            Err(e) => error!(error = %e, "Scheduled cleanup failed"),
        }
        Some(result)
    }
}
