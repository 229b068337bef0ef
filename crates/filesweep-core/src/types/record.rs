//! File record as stored in the metadata store.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Layout of `$createdAt`: millisecond precision with a literal UTC offset.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.%3f+00:00";

/// One tracked upload: a metadata document paired with a stored object.
///
/// Field names follow the platform's system attributes; any user-defined
/// attributes on the document are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Document ID, also the object ID in the bucket.
    #[serde(rename = "$id")]
    pub id: String,
    /// Raw creation timestamp, see [`CREATED_AT_FORMAT`].
    #[serde(rename = "$createdAt")]
    pub created_at: String,
    /// Database the document lives in; filled from the listing when absent.
    #[serde(rename = "$databaseId", default)]
    pub database_id: String,
    /// Collection the document lives in; filled from the listing when absent.
    #[serde(rename = "$collectionId", default)]
    pub collection_id: String,
}

impl FileRecord {
    /// Create a record from its parts.
    pub fn new(
        id: impl Into<String>,
        created_at: impl Into<String>,
        database_id: impl Into<String>,
        collection_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            created_at: created_at.into(),
            database_id: database_id.into(),
            collection_id: collection_id.into(),
        }
    }

    /// ID of the object backing this record.
    pub fn storage_object_id(&self) -> &str {
        &self.id
    }

    /// Parse the creation timestamp.
    pub fn created_at(&self) -> AppResult<DateTime<Utc>> {
        parse_created_at(&self.created_at)
    }
}

/// Parse a timestamp in [`CREATED_AT_FORMAT`].
pub fn parse_created_at(raw: &str) -> AppResult<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, CREATED_AT_FORMAT).map_err(|e| {
        AppError::with_source(
            crate::error::ErrorKind::Validation,
            format!("parsing time {raw:?}: {e}"),
            e,
        )
    })?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// Render a timestamp in [`CREATED_AT_FORMAT`].
pub fn format_created_at(at: DateTime<Utc>) -> String {
    at.format(CREATED_AT_FORMAT).to_string()
}
