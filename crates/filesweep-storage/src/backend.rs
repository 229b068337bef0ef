//! Backend manager: builds the object, metadata, and health stores for a
//! request according to the configured provider.

use std::sync::Arc;

use filesweep_core::config::{AppConfig, ProviderKind};
use filesweep_core::error::AppError;
use filesweep_core::result::AppResult;
use filesweep_core::traits::{HealthProbe, MetadataStore, ObjectStore};

#[cfg(feature = "appwrite")]
use crate::providers::AppwriteClient;
#[cfg(feature = "local")]
use crate::providers::LocalStore;
use crate::providers::MemoryStore;

/// The three collaborators one cleanup or health call works against.
#[derive(Debug, Clone)]
pub struct Backend {
    /// Object store holding file bytes.
    pub objects: Arc<dyn ObjectStore>,
    /// Metadata store holding file records.
    pub metadata: Arc<dyn MetadataStore>,
    /// Platform health probe.
    pub health: Arc<dyn HealthProbe>,
}

impl Backend {
    /// Use one value for all three roles.
    pub fn from_store<S>(store: S) -> Self
    where
        S: ObjectStore + MetadataStore + HealthProbe + Clone,
    {
        Self {
            objects: Arc::new(store.clone()),
            metadata: Arc::new(store.clone()),
            health: Arc::new(store),
        }
    }
}

impl From<MemoryStore> for Backend {
    fn from(store: MemoryStore) -> Self {
        Self::from_store(store)
    }
}

#[derive(Debug, Clone)]
enum Provider {
    #[cfg(feature = "appwrite")]
    Appwrite {
        http: reqwest::Client,
        config: filesweep_core::config::AppwriteConfig,
    },
    Shared(Backend),
}

/// Hands out a [`Backend`] per call.
///
/// Appwrite backends are built per credential (the key usually arrives in
/// the request header) over one shared HTTP pool; other providers are
/// shared as-is and ignore the key.
#[derive(Debug, Clone)]
pub struct BackendManager {
    provider: Provider,
}

impl BackendManager {
    /// Build the manager for the configured provider.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let provider = match config.cleanup.provider {
            #[cfg(feature = "appwrite")]
            ProviderKind::Appwrite => Provider::Appwrite {
                http: AppwriteClient::http_client(&config.appwrite)?,
                config: config.appwrite.clone(),
            },
            #[cfg(feature = "local")]
            ProviderKind::Local => {
                let store = LocalStore::new(&config.local.root_path).await?;
                Provider::Shared(Backend::from_store(store))
            }
            #[allow(unreachable_patterns)]
            other => {
                return Err(AppError::configuration(format!(
                    "Provider '{other}' is not compiled in"
                )));
            }
        };
        tracing::info!(provider = %config.cleanup.provider, "Backend manager initialized");
        Ok(Self { provider })
    }

    /// Wrap an existing backend shared by every call.
    pub fn shared(backend: impl Into<Backend>) -> Self {
        Self {
            provider: Provider::Shared(backend.into()),
        }
    }

    /// Backend for one call. `api_key` overrides the configured fallback.
    pub fn connect(&self, api_key: Option<&str>) -> AppResult<Backend> {
        match &self.provider {
            #[cfg(feature = "appwrite")]
            Provider::Appwrite { http, config } => {
                let key = api_key
                    .map(str::to_string)
                    .or_else(|| config.api_key.clone());
                let client = AppwriteClient::new(http.clone(), config, key)?;
                Ok(Backend::from_store(client))
            }
            Provider::Shared(backend) => Ok(backend.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filesweep_core::types::FileRecord;

    #[tokio::test]
    async fn shared_backend_ignores_key() {
        let store = MemoryStore::new();
        store
            .insert(
                "bucket",
                FileRecord::new("a", "2024-01-01T00:00:00.000+00:00", "db", "col"),
            )
            .await;
        let manager = BackendManager::shared(store);

        let backend = manager.connect(Some("whatever")).unwrap();
        assert_eq!(backend.metadata.list_records("db", "col").await.unwrap().len(), 1);
        assert_eq!(backend.objects.provider_type(), "memory");
    }

    #[tokio::test]
    async fn local_provider_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.cleanup.provider = ProviderKind::Local;
        config.local.root_path = dir.path().to_str().unwrap().to_string();

        let manager = BackendManager::from_config(&config).await.unwrap();
        let backend = manager.connect(None).unwrap();
        assert_eq!(backend.health.health().await.unwrap()["status"], "pass");
    }

    #[tokio::test]
    async fn appwrite_provider_connects_per_key() {
        let mut config = AppConfig::default();
        config.appwrite.endpoint = "https://cloud.example.com/v1".into();
        config.appwrite.project_id = "proj".into();

        let manager = BackendManager::from_config(&config).await.unwrap();
        let backend = manager.connect(Some("key")).unwrap();
        assert_eq!(backend.objects.provider_type(), "appwrite");
    }
}
