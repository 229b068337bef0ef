//! Lists expired records without deleting them.

use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use filesweep_core::error::AppError;
use filesweep_core::types::FileRecord;
use filesweep_worker::CleanupService;

/// Arguments for the expired command
#[derive(Debug, Args)]
pub struct ExpiredArgs {
    /// API key; overrides `appwrite.api_key`
    #[arg(long)]
    pub api_key: Option<String>,
}

/// One expired record
#[derive(Debug, Serialize, Tabled)]
pub struct ExpiredRow {
    /// Record ID
    #[tabled(rename = "ID")]
    pub id: String,
    /// Raw creation timestamp
    #[tabled(rename = "Created")]
    pub created_at: String,
    /// Whole hours since creation
    #[tabled(rename = "Age (h)")]
    pub age_hours: i64,
}

impl ExpiredRow {
    fn new(record: FileRecord, now: DateTime<Utc>) -> Self {
        let age_hours = record
            .created_at()
            .map(|at| (now - at).num_hours())
            .unwrap_or_default();
        Self {
            id: record.id,
            created_at: record.created_at,
            age_hours,
        }
    }
}

/// Execute the expired listing
pub async fn execute(
    args: &ExpiredArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (config, backend) = super::connect(config_path, args.api_key.as_deref()).await?;
    let now = Utc::now();
    let selection = CleanupService::new(&config.cleanup)
        .expired(&backend, now)
        .await?;

    let rows: Vec<ExpiredRow> = selection
        .expired
        .into_iter()
        .map(|r| ExpiredRow::new(r, now))
        .collect();
    output::print_list(&rows, format);

    if format == OutputFormat::Table {
        output::print_kv("Retained", &selection.retained.to_string());
        if !selection.unparsable.is_empty() {
            output::print_kv("Unparsable", &selection.unparsable.join(", "));
        }
    }
    Ok(())
}
