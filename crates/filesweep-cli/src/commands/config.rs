//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use filesweep_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Check that every setting a cleanup run needs is present
    Validate,
    /// Generate a default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config/generated.toml")]
        output: String,
    },
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut config = super::load_config(config_path)?;
            if config.appwrite.api_key.is_some() {
                config.appwrite.api_key = Some("****".to_string());
            }
            match format {
                OutputFormat::Json => output::print_json(&config),
                OutputFormat::Table => println!("{:#?}", config),
            }
        }
        ConfigCommand::Validate => {
            let config = super::load_config(config_path)?;
            if let Err(e) = config.validate() {
                output::print_error(&format!("Configuration invalid: {}", e.message));
                return Err(e);
            }
            output::print_success("Configuration is valid");
            output::print_kv("Provider", &config.cleanup.provider.to_string());
            output::print_kv(
                "Target",
                &format!(
                    "{}/{} -> bucket {}",
                    config.cleanup.database_id,
                    config.cleanup.collection_id,
                    config.cleanup.bucket_id
                ),
            );
            output::print_kv(
                "Retention",
                &format!("{}h", config.cleanup.retention_hours),
            );
            output::print_kv(
                "Concurrency",
                &match config.cleanup.max_concurrency {
                    0 => "unbounded".to_string(),
                    n => n.to_string(),
                },
            );
            if config.worker.enabled {
                output::print_kv("Schedule", &config.worker.schedule);
            }
        }
        ConfigCommand::Generate { output: out_path } => {
            let default_config = include_str!("../../../../config/default.toml");

            if let Some(parent) = std::path::Path::new(out_path).parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(out_path, default_config).await?;

            output::print_success(&format!("Default config written to '{}'", out_path));
        }
    }

    Ok(())
}
