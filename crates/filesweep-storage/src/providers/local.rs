//! Local filesystem provider.
//!
//! Layout under the root:
//! - `buckets/<bucket>/<object_id>`: object bytes
//! - `databases/<database>/<collection>/<record_id>.json`: record documents

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tokio::fs;
use tracing::{debug, warn};

use filesweep_core::error::{AppError, ErrorKind};
use filesweep_core::result::AppResult;
use filesweep_core::traits::{HealthProbe, MetadataStore, ObjectStore};
use filesweep_core::types::FileRecord;

use super::check_id;

/// Stored record document; the location supplies anything left out.
#[derive(Debug, Deserialize)]
struct LocalDocument {
    #[serde(rename = "$createdAt")]
    created_at: String,
}

/// Object and metadata store backed by a directory tree.
#[derive(Debug, Clone)]
pub struct LocalStore {
    /// Root directory holding `buckets/` and `databases/`.
    root: PathBuf,
}

impl LocalStore {
    /// Create a new local store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    fn object_path(&self, bucket_id: &str, object_id: &str) -> AppResult<PathBuf> {
        check_id("bucket", bucket_id)?;
        check_id("file", object_id)?;
        Ok(self.root.join("buckets").join(bucket_id).join(object_id))
    }

    fn collection_path(&self, database_id: &str, collection_id: &str) -> AppResult<PathBuf> {
        check_id("database", database_id)?;
        check_id("collection", collection_id)?;
        Ok(self
            .root
            .join("databases")
            .join(database_id)
            .join(collection_id))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Store an object's bytes.
    pub async fn put_object(&self, bucket_id: &str, object_id: &str, data: Bytes) -> AppResult<()> {
        let path = self.object_path(bucket_id, object_id)?;
        self.ensure_parent(&path).await?;
        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write file: {object_id}"),
                e,
            )
        })?;
        debug!(bucket_id, object_id, bytes = data.len(), "Wrote object");
        Ok(())
    }

    /// Store a record document.
    pub async fn put_record(&self, record: &FileRecord) -> AppResult<()> {
        check_id("document", &record.id)?;
        let path = self
            .collection_path(&record.database_id, &record.collection_id)?
            .join(format!("{}.json", record.id));
        self.ensure_parent(&path).await?;
        let body = serde_json::to_vec_pretty(record)?;
        fs::write(&path, body).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to write document: {}", record.id),
                e,
            )
        })?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn delete_object(&self, bucket_id: &str, object_id: &str) -> AppResult<()> {
        let path = self.object_path(bucket_id, object_id)?;
        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!(
                    "The requested file could not be found: {object_id}"
                ))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete file: {object_id}: {e}"),
                    e,
                )
            }
        })?;
        debug!(bucket_id, object_id, "Deleted object");
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for LocalStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn list_records(
        &self,
        database_id: &str,
        collection_id: &str,
    ) -> AppResult<Vec<FileRecord>> {
        let dir_path = self.collection_path(database_id, collection_id)?;
        let exists = fs::try_exists(&dir_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to access collection: {collection_id}"),
                e,
            )
        })?;
        if !exists {
            return Err(AppError::not_found(format!(
                "Collection with the requested ID could not be found: {collection_id}"
            )));
        }

        let mut dir = fs::read_dir(&dir_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to list collection: {collection_id}"),
                e,
            )
        })?;

        let mut records = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read collection entry", e)
        })? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!(path = %path.display(), "Skipping document with non-UTF-8 name");
                continue;
            };

            let raw = fs::read(&path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to read document: {id}"),
                    e,
                )
            })?;
            let doc: LocalDocument = serde_json::from_slice(&raw).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Serialization,
                    format!("Invalid document {id}: {e}"),
                    e,
                )
            })?;

            records.push(FileRecord::new(
                id,
                doc.created_at,
                database_id,
                collection_id,
            ));
        }

        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    async fn delete_record(
        &self,
        database_id: &str,
        collection_id: &str,
        record_id: &str,
    ) -> AppResult<()> {
        check_id("document", record_id)?;
        let path = self
            .collection_path(database_id, collection_id)?
            .join(format!("{record_id}.json"));
        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!(
                    "Document with the requested ID could not be found: {record_id}"
                ))
            } else {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to delete document: {record_id}: {e}"),
                    e,
                )
            }
        })?;
        debug!(database_id, collection_id, record_id, "Deleted document");
        Ok(())
    }
}

#[async_trait]
impl HealthProbe for LocalStore {
    async fn health(&self) -> AppResult<serde_json::Value> {
        if self.root.is_dir() {
            Ok(serde_json::json!({
                "status": "pass",
                "provider": "local",
                "root": self.root.display().to_string(),
            }))
        } else {
            Err(AppError::service_unavailable(format!(
                "Storage root is not a directory: {}",
                self.root.display()
            )))
        }
    }
}
