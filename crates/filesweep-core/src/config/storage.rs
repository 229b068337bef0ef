//! Local storage provider configuration.

use serde::{Deserialize, Serialize};

/// Local filesystem backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root directory holding `buckets/` and `databases/`.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

fn default_local_root() -> String {
    "./data/local".to_string()
}
