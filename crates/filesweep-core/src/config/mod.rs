//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files, `FILESWEEP__` environment variables, and finally the
//! variables the Appwrite function runtime injects. Each sub-module
//! represents a logical configuration section.

pub mod app;
pub mod appwrite;
pub mod cleanup;
pub mod logging;
pub mod storage;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::appwrite::AppwriteConfig;
pub use self::cleanup::{CleanupConfig, InvalidTimestampPolicy, ProviderKind};
pub use self::logging::LoggingConfig;
pub use self::storage::LocalStorageConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Runtime variables mapped onto configuration keys.
///
/// These take precedence over files and `FILESWEEP__` variables so the
/// binary behaves the same when deployed as an Appwrite function.
const PLATFORM_OVERRIDES: &[(&str, &str)] = &[
    ("APPWRITE_FUNCTION_API_ENDPOINT", "appwrite.endpoint"),
    ("APPWRITE_FUNCTION_PROJECT_ID", "appwrite.project_id"),
    ("DATABASE_ID", "cleanup.database_id"),
    ("COLLECTION_ID", "cleanup.collection_id"),
    ("BUCKET_ID", "cleanup.bucket_id"),
];

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Appwrite connection settings.
    #[serde(default)]
    pub appwrite: AppwriteConfig,
    /// Local filesystem backend settings.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// Cleanup targets and policy.
    #[serde(default)]
    pub cleanup: CleanupConfig,
    /// Scheduler settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for an environment.
    ///
    /// Merges `config/default.toml` with `config/{env}.toml` (both optional),
    /// then `FILESWEEP__*` variables, then the platform variables.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        Self::finish(builder)
    }

    /// Load configuration from one explicit file plus the environment.
    pub fn load_file(path: &str) -> Result<Self, AppError> {
        let builder = config::Config::builder().add_source(config::File::with_name(path));
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AppError> {
        let mut builder = builder.add_source(
            config::Environment::with_prefix("FILESWEEP")
                .separator("__")
                .try_parsing(true),
        );

        for (var, key) in PLATFORM_OVERRIDES {
            builder = builder
                .set_override_option(*key, std::env::var(var).ok())
                .map_err(|e| AppError::configuration(format!("Invalid override {var}: {e}")))?;
        }

        let config = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Check that the settings needed for a cleanup run are present.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut missing = Vec::new();
        if self.cleanup.bucket_id.is_empty() {
            missing.push("cleanup.bucket_id (BUCKET_ID)");
        }
        if self.cleanup.database_id.is_empty() {
            missing.push("cleanup.database_id (DATABASE_ID)");
        }
        if self.cleanup.collection_id.is_empty() {
            missing.push("cleanup.collection_id (COLLECTION_ID)");
        }
        if self.cleanup.provider == ProviderKind::Appwrite {
            if self.appwrite.endpoint.is_empty() {
                missing.push("appwrite.endpoint (APPWRITE_FUNCTION_API_ENDPOINT)");
            }
            if self.appwrite.project_id.is_empty() {
                missing.push("appwrite.project_id (APPWRITE_FUNCTION_PROJECT_ID)");
            }
        }

        if !missing.is_empty() {
            return Err(AppError::configuration(format!(
                "Missing settings: {}",
                missing.join(", ")
            )));
        }
        if self.cleanup.retention().is_none() {
            return Err(AppError::configuration(format!(
                "cleanup.retention_hours out of range: {}",
                self.cleanup.retention_hours
            )));
        }
        Ok(())
    }
}
