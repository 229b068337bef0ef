//! Shared domain types.

pub mod record;

pub use record::{CREATED_AT_FORMAT, FileRecord, format_created_at, parse_created_at};
