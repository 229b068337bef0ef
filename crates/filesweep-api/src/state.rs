//! Application state shared across all handlers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use filesweep_core::config::AppConfig;
use filesweep_storage::BackendManager;
use filesweep_worker::CleanupService;

/// Application state passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Builds a backend per request credential
    pub backends: BackendManager,
    /// Cleanup pass over the configured collection
    pub cleanup_service: Arc<CleanupService>,
    /// Cancelled when the server shuts down; in-flight runs observe it
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Build the state for `config` over an existing backend manager.
    pub fn new(config: AppConfig, backends: BackendManager, shutdown: CancellationToken) -> Self {
        let cleanup_service = Arc::new(CleanupService::new(&config.cleanup));
        Self {
            config: Arc::new(config),
            backends,
            cleanup_service,
            shutdown,
        }
    }
}
