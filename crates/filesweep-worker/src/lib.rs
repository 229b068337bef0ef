//! Cleanup processing for filesweep.
//!
//! This crate provides:
//! - A selector that partitions records by age
//! - A deletion engine that removes object and record for each expired entry
//! - The cleanup service composing listing, selection, and deletion
//! - A cron scheduler running the cleanup job periodically

pub mod engine;
pub mod jobs;
pub mod report;
pub mod scheduler;
pub mod selector;
pub mod service;

pub use engine::DeletionEngine;
pub use report::{CleanupReport, Outcome};
pub use scheduler::CronScheduler;
pub use selector::Selector;
pub use service::CleanupService;
