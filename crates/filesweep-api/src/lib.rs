//! # filesweep-api
//!
//! HTTP layer for filesweep built on Axum.
//!
//! Every path accepts any method: `/health` passes the platform health
//! status through, `/cleanup` runs one cleanup pass and returns the plain
//! text report, anything else is acknowledged.

pub mod app;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
