//! Cleanup trigger handler.

use axum::extract::State;
use chrono::Utc;

use crate::error::ApiError;
use crate::extractors::ApiKey;
use crate::state::AppState;

/// ANY /cleanup
///
/// Runs one cleanup pass and returns the plain text report, or
/// `No files to delete` when nothing expired.
pub async fn cleanup(State(state): State<AppState>, api_key: ApiKey) -> Result<String, ApiError> {
    let backend = state.backends.connect(api_key.as_deref())?;
    let cancel = state.shutdown.child_token();
    let report = state
        .cleanup_service
        .run(&backend, Utc::now(), &cancel)
        .await?;
    Ok(report.render())
}
