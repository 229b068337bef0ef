//! Request handlers.

pub mod cleanup;
pub mod fallback;
pub mod health;
