//! Metadata store trait for the record half of a file record.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::FileRecord;

/// Structured record storage, addressed by database and collection.
#[async_trait]
pub trait MetadataStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name.
    fn provider_type(&self) -> &str;

    /// List every record in a collection.
    ///
    /// Implementations page through the whole collection; callers see one
    /// complete listing or an error.
    async fn list_records(
        &self,
        database_id: &str,
        collection_id: &str,
    ) -> AppResult<Vec<FileRecord>>;

    /// Delete one record. Missing records are reported as errors.
    async fn delete_record(
        &self,
        database_id: &str,
        collection_id: &str,
        record_id: &str,
    ) -> AppResult<()>;
}
