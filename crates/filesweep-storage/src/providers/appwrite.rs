//! Appwrite REST provider (storage, databases, and health services).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use filesweep_core::config::AppwriteConfig;
use filesweep_core::error::{AppError, ErrorKind};
use filesweep_core::result::AppResult;
use filesweep_core::traits::{HealthProbe, MetadataStore, ObjectStore};
use filesweep_core::types::FileRecord;

use super::check_id;

/// Error body returned by the Appwrite API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// One page of `GET .../documents`.
#[derive(Debug, Deserialize)]
struct DocumentPage {
    #[serde(default)]
    total: u64,
    documents: Vec<FileRecord>,
}

/// Client for one project, authenticated with one API key.
#[derive(Debug, Clone)]
pub struct AppwriteClient {
    /// Shared HTTP connection pool.
    http: reqwest::Client,
    /// API base, e.g. `https://cloud.appwrite.io/v1`.
    base_url: Url,
    /// Value of `X-Appwrite-Project`.
    project_id: String,
    /// Value of `X-Appwrite-Key`, if any.
    api_key: Option<String>,
    /// Listing page size.
    page_size: u32,
}

impl AppwriteClient {
    /// Build the shared HTTP client for a configuration.
    pub fn http_client(config: &AppwriteConfig) -> AppResult<reqwest::Client> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("filesweep/", env!("CARGO_PKG_VERSION")));
        if config.request_timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_seconds));
        }
        builder
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })
    }

    /// Create a client using an existing HTTP pool.
    pub fn new(
        http: reqwest::Client,
        config: &AppwriteConfig,
        api_key: Option<String>,
    ) -> AppResult<Self> {
        // Trailing slash so `join` appends instead of replacing `/v1`.
        let base_url = Url::parse(&format!("{}/", config.base_url())).map_err(|e| {
            AppError::configuration(format!("Invalid Appwrite endpoint {:?}: {e}", config.endpoint))
        })?;

        Ok(Self {
            http,
            base_url,
            project_id: config.project_id.clone(),
            api_key,
            page_size: config.page_size.max(1),
        })
    }

    fn url(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::internal(format!("Invalid request path {path:?}: {e}")))
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, url)
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Response-Format", "1.5.0");
        if let Some(key) = &self.api_key {
            builder = builder.header("X-Appwrite-Key", key);
        }
        builder
    }

    /// Send a request and turn non-2xx responses into errors.
    async fn send(&self, builder: reqwest::RequestBuilder) -> AppResult<reqwest::Response> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or_else(|_| format!("HTTP {status}"));
        Err(AppError::new(status_kind(status), message))
    }

    async fn list_page(
        &self,
        database_id: &str,
        collection_id: &str,
        cursor: Option<&str>,
    ) -> AppResult<DocumentPage> {
        let mut url = self.url(&format!(
            "databases/{database_id}/collections/{collection_id}/documents"
        ))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(
                "queries[]",
                &serde_json::json!({"method": "limit", "values": [self.page_size]}).to_string(),
            );
            if let Some(cursor) = cursor {
                pairs.append_pair(
                    "queries[]",
                    &serde_json::json!({"method": "cursorAfter", "values": [cursor]}).to_string(),
                );
            }
        }

        let response = self.send(self.request(Method::GET, url)).await?;
        response.json::<DocumentPage>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Invalid document listing: {e}"),
                e,
            )
        })
    }
}

#[async_trait]
impl ObjectStore for AppwriteClient {
    fn provider_type(&self) -> &str {
        "appwrite"
    }

    async fn delete_object(&self, bucket_id: &str, object_id: &str) -> AppResult<()> {
        check_id("bucket", bucket_id)?;
        check_id("file", object_id)?;
        let url = self.url(&format!("storage/buckets/{bucket_id}/files/{object_id}"))?;
        self.send(self.request(Method::DELETE, url)).await?;
        debug!(bucket_id, object_id, "Deleted file");
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for AppwriteClient {
    fn provider_type(&self) -> &str {
        "appwrite"
    }

    async fn list_records(
        &self,
        database_id: &str,
        collection_id: &str,
    ) -> AppResult<Vec<FileRecord>> {
        check_id("database", database_id)?;
        check_id("collection", collection_id)?;

        let mut records = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self
                .list_page(database_id, collection_id, cursor.as_deref())
                .await?;
            let fetched = page.documents.len();
            cursor = page.documents.last().map(|d| d.id.clone());
            records.extend(page.documents.into_iter().map(|mut record| {
                if record.database_id.is_empty() {
                    record.database_id = database_id.to_string();
                }
                if record.collection_id.is_empty() {
                    record.collection_id = collection_id.to_string();
                }
                record
            }));

            debug!(
                database_id,
                collection_id,
                fetched,
                total = page.total,
                "Fetched document page"
            );

            if fetched < self.page_size as usize || cursor.is_none() {
                break;
            }
        }
        Ok(records)
    }

    async fn delete_record(
        &self,
        database_id: &str,
        collection_id: &str,
        record_id: &str,
    ) -> AppResult<()> {
        check_id("database", database_id)?;
        check_id("collection", collection_id)?;
        check_id("document", record_id)?;
        let url = self.url(&format!(
            "databases/{database_id}/collections/{collection_id}/documents/{record_id}"
        ))?;
        self.send(self.request(Method::DELETE, url)).await?;
        debug!(database_id, collection_id, record_id, "Deleted document");
        Ok(())
    }
}

#[async_trait]
impl HealthProbe for AppwriteClient {
    async fn health(&self) -> AppResult<serde_json::Value> {
        let url = self.url("health")?;
        let response = self.send(self.request(Method::GET, url)).await?;
        response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Invalid health payload: {e}"),
                e,
            )
        })
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    let kind = if err.is_timeout() {
        ErrorKind::Timeout
    } else {
        ErrorKind::ExternalService
    };
    AppError::with_source(kind, err.to_string(), err)
}

fn status_kind(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorKind::Authentication,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::SERVICE_UNAVAILABLE => ErrorKind::ServiceUnavailable,
        StatusCode::BAD_REQUEST => ErrorKind::Validation,
        _ => ErrorKind::ExternalService,
    }
}
