//! One-shot cleanup command.

use chrono::Utc;
use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::output::{self, OutputFormat};
use filesweep_core::error::AppError;
use filesweep_worker::CleanupService;

/// Arguments for the run command
#[derive(Debug, Args)]
pub struct RunArgs {
    /// API key; overrides `appwrite.api_key`
    #[arg(long)]
    pub api_key: Option<String>,
}

/// Execute one cleanup pass. Ctrl+C cancels the in-flight deletions.
pub async fn execute(
    args: &RunArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (config, backend) = super::connect(config_path, args.api_key.as_deref()).await?;
    let service = CleanupService::new(&config.cleanup);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            output::print_warning("Interrupted, cancelling remaining deletions");
            on_interrupt.cancel();
        }
    });

    let report = service.run(&backend, Utc::now(), &cancel).await?;

    match format {
        OutputFormat::Table => print!("{}", report.render()),
        OutputFormat::Json => output::print_json(&report),
    }
    if report.is_empty() && format == OutputFormat::Table {
        println!();
    }

    let orphaned = report.orphaned_records();
    if !orphaned.is_empty() {
        output::print_warning(&format!(
            "{} entries remain without their files: {}",
            orphaned.len(),
            orphaned.join(", ")
        ));
    }
    if report.failed() > 0 {
        return Err(AppError::storage(format!(
            "{} of {} deletions failed",
            report.failed(),
            report.outcomes.len()
        )));
    }
    Ok(())
}
