//! Health status of the backing platform.

use async_trait::async_trait;

use crate::result::AppResult;

/// Reports the backing platform's health as an opaque JSON document.
#[async_trait]
pub trait HealthProbe: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch the current status payload.
    async fn health(&self) -> AppResult<serde_json::Value>;
}
