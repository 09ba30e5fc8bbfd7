//! watchdog Entry Point

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use watchdog::cli::Cli;
use watchdog::common::config::MonitorConfig;
use watchdog::common::error::MonitorError;
use watchdog::{logging, Monitor};

#[tokio::main]
async fn main() {
    // Parse CLI (only -h/--help and -V/--version)
    let _cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Error: failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run().await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), MonitorError> {
    let config = MonitorConfig::from_env();
    config.validate()?;
    let config = Arc::new(config);

    info!("Monitor service v{} started", env!("CARGO_PKG_VERSION"));
    info!(
        "Polling {} every {}s",
        config.target_url, config.poll_interval_secs
    );
    info!("Latency threshold: {}s", config.latency_threshold_secs);
    if !config.notifications_enabled() {
        warn!("Notification channel not set, alerts will only be logged");
    }

    let monitor = Arc::new(Monitor::from_config(config)?);
    let handle = monitor.start();

    tokio::select! {
        _ = shutdown_signal() => {}
        joined = handle => {
            if let Err(e) = joined {
                error!("Monitor loop terminated: {}", e);
            }
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}
