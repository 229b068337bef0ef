//! Appwrite platform connection settings.

use serde::{Deserialize, Serialize};

/// Connection settings for the Appwrite REST API.
///
/// `endpoint` and `project_id` are normally injected by the function runtime
/// through `APPWRITE_FUNCTION_API_ENDPOINT` / `APPWRITE_FUNCTION_PROJECT_ID`.
/// The API key usually arrives per request in the `x-appwrite-key` header;
/// `api_key` is only the fallback for scheduled and CLI runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppwriteConfig {
    /// API endpoint, e.g. `https://cloud.appwrite.io/v1`.
    #[serde(default)]
    pub endpoint: String,
    /// Project ID sent as `X-Appwrite-Project`.
    #[serde(default)]
    pub project_id: String,
    /// Fallback API key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Documents fetched per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for AppwriteConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            project_id: String::new(),
            api_key: None,
            request_timeout_seconds: default_request_timeout(),
            page_size: default_page_size(),
        }
    }
}

impl AppwriteConfig {
    /// Endpoint without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

fn default_request_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    100
}
