//! Cron scheduler for periodic cleanup.

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use filesweep_core::error::AppError;

use crate::jobs::CleanupJob;

/// Cron-based scheduler for the cleanup job
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler })
    }

    /// Run `job` on the six-field cron `schedule` (seconds first).
    pub async fn register_cleanup(&self, schedule: &str, job: CleanupJob) -> Result<(), AppError> {
        let cron = CronJob::new_async(schedule, move |_uuid, _lock| {
            let job = job.clone();
            Box::pin(async move {
                tracing::debug!("Running scheduled cleanup");
                let _ = job.run_once().await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid cleanup schedule '{}': {}", schedule, e))
        })?;

        self.scheduler
            .add(cron)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add cleanup schedule: {}", e)))?;

        tracing::info!("Registered: cleanup ({})", schedule);
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use filesweep_core::config::CleanupConfig;
    use filesweep_storage::BackendManager;
    use filesweep_storage::providers::MemoryStore;
    use tokio_util::sync::CancellationToken;

    use crate::service::CleanupService;

    fn job() -> CleanupJob {
        CleanupJob::new(
            Arc::new(CleanupService::new(&CleanupConfig::default())),
            BackendManager::shared(MemoryStore::new()),
            CancellationToken::new(),
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_rejects_invalid_schedule() {
        let scheduler = CronScheduler::new().await.unwrap();
        let err = scheduler
            .register_cleanup("every hour please", job())
            .await
            .unwrap_err();
        assert!(err.message.contains("every hour please"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_registers_and_shuts_down() {
        let mut scheduler = CronScheduler::new().await.unwrap();
        scheduler.register_cleanup("0 0 * * * *", job()).await.unwrap();
        scheduler.start().await.unwrap();
        scheduler.shutdown().await.unwrap();
    }
}
