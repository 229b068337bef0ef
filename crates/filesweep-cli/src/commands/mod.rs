//! CLI command definitions and dispatch.

pub mod config;
pub mod expired;
pub mod run;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use filesweep_core::config::AppConfig;
use filesweep_core::error::AppError;
use filesweep_storage::{Backend, BackendManager};

/// filesweep: delete stored files older than the retention window
#[derive(Debug, Parser)]
#[command(name = "filesweep", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file; defaults to `config/default.toml` plus the
    /// `FILESWEEP_ENV` overlay
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run one cleanup pass and print the report
    Run(run::RunArgs),
    /// List expired records without deleting anything
    Expired(expired::ExpiredArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config_path = self.config.as_deref();
        match &self.command {
            Commands::Run(args) => run::execute(args, config_path, self.format).await,
            Commands::Expired(args) => expired::execute(args, config_path, self.format).await,
            Commands::Config(args) => config::execute(args, config_path, self.format).await,
        }
    }
}

/// Helper: load configuration from an explicit file or the environment layers
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, AppError> {
    match config_path {
        Some(path) => AppConfig::load_file(path),
        None => {
            let env = std::env::var("FILESWEEP_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Helper: validated configuration plus a backend for `api_key`
pub async fn connect(
    config_path: Option<&str>,
    api_key: Option<&str>,
) -> Result<(AppConfig, Backend), AppError> {
    let config = load_config(config_path)?;
    config.validate()?;
    let backend = BackendManager::from_config(&config)
        .await?
        .connect(api_key)?;
    Ok((config, backend))
}
