//! Binary entry point: loads configuration, wires up the environment
//! manager and notification pipeline, optionally installs a startup schema
//! and/or restores a snapshot, then serves the control-plane API until a
//! shutdown signal arrives.

use achemdb::api::{create_app, AppState};
use achemdb::config::{AppConfig, CliArgs};
use achemdb::id::UuidGenerator;
use achemdb::logging::TracingLogSink;
use achemdb::manager::EnvironmentManager;
use achemdb::model::SchemaConfig;
use achemdb::notify::{NotificationPipeline, NotifierRegistry};
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Lowercases, maps `warning` to `warn`, and falls back to `info` for
/// anything outside `debug`/`info`/`warn`/`error`.
fn normalize_log_level(level: &str) -> &'static str {
    match level.to_ascii_lowercase().as_str() {
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}

fn init_logging(level: &str) {
    let level = normalize_log_level(level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_cli(CliArgs::parse());
    init_logging(&config.log_level);

    info!(addr = %config.addr, env_id = %config.env_id, "starting achemdbd");

    let log = Arc::new(TracingLogSink);
    let registry = Arc::new(NotifierRegistry::new());
    let notifications = NotificationPipeline::start(
        registry.clone(),
        achemdb::config::defaults::NOTIFY_QUEUE_CAPACITY,
        achemdb::config::defaults::NOTIFY_WORKER_COUNT,
        log.clone(),
    );

    let manager = Arc::new(EnvironmentManager::new(
        config.snapshot_dir.clone(),
        config.snapshot_every_ticks,
        notifications,
        log.clone(),
        Arc::new(UuidGenerator),
    ));

    if let Some(schema_file) = &config.schema_file {
        let raw = std::fs::read_to_string(schema_file)
            .with_context(|| format!("failed to read schema file {}", schema_file.display()))?;
        let schema: SchemaConfig = serde_json::from_str(&raw)
            .with_context(|| format!("invalid schema JSON in {}", schema_file.display()))?;
        match manager.create(config.env_id.clone(), schema) {
            Ok(_) => info!(env_id = %config.env_id, "startup environment created"),
            Err(achemdb::CoreError::AlreadyExists(_)) => {
                info!(env_id = %config.env_id, "startup environment restored from snapshot");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("shutdown signal received");
        shutdown.cancel();
    });

    let app = create_app(AppState {
        manager,
        registry,
        log,
    });

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.addr))?;
    info!(addr = %config.addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await
        .context("http server error")?;

    info!("shutdown complete");
    Ok(())
}
