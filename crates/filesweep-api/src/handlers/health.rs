//! Health passthrough handler.

use axum::Json;
use axum::extract::State;

use crate::error::ApiError;
use crate::extractors::ApiKey;
use crate::state::AppState;

/// ANY /health
///
/// Returns the platform health payload unchanged.
pub async fn health(
    State(state): State<AppState>,
    api_key: ApiKey,
) -> Result<Json<serde_json::Value>, ApiError> {
    let backend = state.backends.connect(api_key.as_deref())?;
    let status = backend.health.health().await?;
    Ok(Json(status))
}
