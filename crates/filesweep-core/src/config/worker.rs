//! Scheduled cleanup configuration.

use serde::{Deserialize, Serialize};

/// Background scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the cron scheduler runs cleanup on its own.
    #[serde(default)]
    pub enabled: bool,
    /// Six-field cron expression (seconds first).
    #[serde(default = "default_schedule")]
    pub schedule: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            schedule: default_schedule(),
        }
    }
}

fn default_schedule() -> String {
    "0 0 * * * *".to_string()
}
