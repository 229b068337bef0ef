//! Convenience result type alias for filesweep.

use crate::error::AppError;

/// A specialized `Result` type for filesweep operations.
pub type AppResult<T> = Result<T, AppError>;
