//! # filesweep-storage
//!
//! Store provider implementations for filesweep: the Appwrite REST API,
//! a local directory tree for development, and in-memory stores for tests.
//! [`BackendManager`] hands out a [`Backend`] per request credential.

pub mod backend;
pub mod providers;

pub use backend::{Backend, BackendManager};
