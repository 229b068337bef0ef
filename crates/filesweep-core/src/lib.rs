//! # filesweep-core
//!
//! Core crate for filesweep. Contains the store traits, configuration
//! schemas, the file record type with its timestamp rules, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other filesweep crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
