//! Beacon Monitor
//!
//! Watches long-running jobs on every server instance the configured user
//! can reach and logs a summary each time the local view is refreshed.
//!
//! Architecture:
//! - Configuration: Load settings from environment or defaults
//! - Client: HTTP communication with the server
//! - Monitor: Accessibility probing and the reconciliation loop

use anyhow::{Context, Result};
use beacon_client::ServerClient;
use beacon_monitor::{HttpServerRepository, JobMonitor, MonitorConfig, MonitorEvent};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beacon_monitor=info,beacon_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Beacon Monitor");

    let config = load_config()?;
    info!(
        "Loaded configuration: server_url={}, active={:?}, idle={:?}, probe={:?}",
        config.server_url,
        config.active_poll_interval,
        config.idle_poll_interval,
        config.instance_probe_interval
    );

    let mut client = ServerClient::new(config.server_url.clone());
    if let Some(token) = &config.api_token {
        client = client.with_token(token.clone());
    }
    let repository = Arc::new(HttpServerRepository::new(Arc::new(client)));

    let monitor = JobMonitor::new(config, repository);
    let mut events = monitor.subscribe();

    monitor.start().await;
    info!(
        "Monitor started with {} accessible instance(s)",
        monitor.accessible_instances().len()
    );

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for shutdown signal")?;
                info!("Shutdown requested");
                break;
            }
            event = events.recv() => match event {
                Ok(MonitorEvent::JobsRefreshed) => log_summary(&monitor),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Skipped {} refresh notification(s)", skipped);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    monitor.stop();
    Ok(())
}

/// Loads configuration from environment variables with fallback to defaults
fn load_config() -> Result<MonitorConfig> {
    let config = match MonitorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            info!("{}, using defaults", e);
            MonitorConfig::default()
        }
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn log_summary(monitor: &JobMonitor) {
    let jobs = monitor.jobs();
    let running = jobs.iter().filter(|job| !job.is_terminal()).count();
    let errors = monitor.errors();

    info!(
        "Jobs refreshed: {} known, {} running, {} accessible instance(s), {} error(s)",
        jobs.len(),
        running,
        monitor.accessible_instances().len(),
        errors.len()
    );

    for job in jobs.iter().filter(|job| !job.is_terminal()) {
        info!(
            "  - job {} on instance {}: {} [{}%] cancellable={}",
            job.id,
            job.instance_id,
            job.description.as_deref().unwrap_or("(no description)"),
            job.progress.map_or_else(|| "?".to_string(), |p| p.to_string()),
            job.can_cancel.map_or("unknown", |c| if c { "yes" } else { "no" })
        );
    }

    for error in &errors {
        warn!("  ! {}", error.message);
    }
}
