//! Route definitions for the filesweep HTTP API.

use axum::{Router, routing::any};

use crate::handlers;
use crate::state::AppState;

/// Build the router. Each path accepts any HTTP method.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", any(handlers::health::health))
        .route("/cleanup", any(handlers::cleanup::cleanup))
        .fallback(handlers::fallback::acknowledge)
        .with_state(state)
}
