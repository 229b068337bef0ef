//! filesweep server: periodic and on-demand cleanup of expired uploads.
//!
//! Main entry point that wires the crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use filesweep_core::config::AppConfig;
use filesweep_core::error::AppError;
use filesweep_storage::BackendManager;
use filesweep_worker::jobs::CleanupJob;
use filesweep_worker::scheduler::CronScheduler;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from an explicit file or the layered defaults
fn load_configuration() -> Result<AppConfig, AppError> {
    match std::env::var("FILESWEEP_CONFIG") {
        Ok(path) => AppConfig::load_file(&path),
        Err(_) => {
            let env = std::env::var("FILESWEEP_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting filesweep v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Check configuration ──────────────────────────────
    config.validate()?;
    tracing::info!(
        provider = %config.cleanup.provider,
        database_id = %config.cleanup.database_id,
        collection_id = %config.cleanup.collection_id,
        bucket_id = %config.cleanup.bucket_id,
        retention_hours = config.cleanup.retention_hours,
        "Cleanup target configured"
    );

    // ── Step 2: Initialize backend ───────────────────────────────
    let backends = BackendManager::from_config(&config).await?;

    // ── Step 3: Shutdown token ───────────────────────────────────
    let shutdown = CancellationToken::new();

    // ── Step 4: Build application state ──────────────────────────
    let app_state = filesweep_api::AppState::new(config.clone(), backends.clone(), shutdown.clone());

    // ── Step 5: Start cron scheduler ─────────────────────────────
    let mut scheduler = if config.worker.enabled {
        tracing::info!("Starting cleanup scheduler...");
        let job = CleanupJob::new(
            Arc::clone(&app_state.cleanup_service),
            backends,
            shutdown.child_token(),
        );
        let scheduler = CronScheduler::new().await?;
        scheduler.register_cleanup(&config.worker.schedule, job).await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Cleanup scheduler disabled");
        None
    };

    // ── Step 6: Build and start HTTP server ──────────────────────
    let app = filesweep_api::build_app(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("filesweep listening on {}", addr);

    // ── Step 7: Graceful shutdown ────────────────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let on_signal = shutdown.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            tracing::warn!("Grace period elapsed, cancelling in-flight cleanups");
            on_signal.cancel();
        });
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 8: Stop background tasks ────────────────────────────
    shutdown.cancel();
    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }

    tracing::info!("filesweep shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
