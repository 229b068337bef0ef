//! Cleanup target and policy configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which backend provides the object and metadata stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Appwrite REST API.
    #[default]
    Appwrite,
    /// Local filesystem (development).
    Local,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Appwrite => write!(f, "appwrite"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// What to do with a record whose creation timestamp does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidTimestampPolicy {
    /// Abort the whole run before any deletion happens.
    #[default]
    Abort,
    /// Log the record and keep it.
    Skip,
}

/// Cleanup targets and run policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Backend provider.
    #[serde(default)]
    pub provider: ProviderKind,
    /// Database holding the file records.
    #[serde(default)]
    pub database_id: String,
    /// Collection holding the file records.
    #[serde(default)]
    pub collection_id: String,
    /// Bucket holding the file objects.
    #[serde(default)]
    pub bucket_id: String,
    /// Records at least this old are deleted.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u64,
    /// Maximum deletion units in flight (0 = unbounded).
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Deadline for one run in seconds (0 = none).
    #[serde(default)]
    pub run_timeout_seconds: u64,
    /// Policy for records with malformed timestamps.
    #[serde(default)]
    pub invalid_timestamp: InvalidTimestampPolicy,
}

impl CleanupConfig {
    /// Retention window as a chrono duration.
    ///
    /// `None` when `retention_hours` does not fit a [`chrono::TimeDelta`].
    pub fn retention(&self) -> Option<chrono::TimeDelta> {
        i64::try_from(self.retention_hours)
            .ok()
            .and_then(chrono::TimeDelta::try_hours)
    }

    /// Run deadline, if one is configured.
    pub fn run_timeout(&self) -> Option<Duration> {
        (self.run_timeout_seconds > 0).then(|| Duration::from_secs(self.run_timeout_seconds))
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            database_id: String::new(),
            collection_id: String::new(),
            bucket_id: String::new(),
            retention_hours: default_retention_hours(),
            max_concurrency: default_max_concurrency(),
            run_timeout_seconds: 0,
            invalid_timestamp: InvalidTimestampPolicy::default(),
        }
    }
}

fn default_retention_hours() -> u64 {
    6
}

fn default_max_concurrency() -> usize {
    16
}
