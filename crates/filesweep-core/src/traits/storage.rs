//! Object store trait for the binary half of a file record.

use async_trait::async_trait;

use crate::result::AppResult;

/// Binary object storage, addressed by bucket and object ID.
///
/// Implementations exist for the Appwrite storage API, a local directory
/// tree, and memory.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "appwrite", "local").
    fn provider_type(&self) -> &str;

    /// Delete one object. Missing objects are reported as errors.
    async fn delete_object(&self, bucket_id: &str, object_id: &str) -> AppResult<()>;
}
