//! Batchq Daemon - Main Entry Point
//! Hosts one JSON-item queue, its background consumer and the JSON-RPC server

mod settings;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use batchq_api_rpc::{server::RpcServerConfig, RpcServer};
use batchq_core::application::shutdown_channel;
use batchq_core::Queue;
use settings::Settings;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("BATCHQ_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("batchq=info"))
        .context("Failed to create env filter")?;

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Batchq daemon v{} starting...", VERSION);

    // 2. Load configuration
    let settings = Settings::from_env();

    // 3. Build the queue; its consumer starts immediately
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let queue = Arc::new(
        Queue::builder()
            .config(settings.queue.clone())
            .handler(|item: serde_json::Value| {
                info!(target: "batchq::sink", item = %item, "Item delivered");
            })
            .shutdown_token(shutdown_rx)
            .build()
            .context("Queue construction failed")?,
    );

    // Effective configuration, after zero->default normalization
    let config = queue.config();
    info!(
        capacity = config.capacity,
        drain_batch_size = config.drain_batch_size,
        idle_interval_ms = config.idle_interval.as_millis() as u64,
        catch_up_interval_ms = config.catch_up_interval.as_millis() as u64,
        "Queue configuration loaded"
    );

    // 4. Start JSON-RPC server
    let rpc_config = RpcServerConfig {
        host: settings.rpc_host.clone(),
        port: settings.rpc_port,
    };
    let (addr, rpc_handle) = RpcServer::new(rpc_config, queue.clone())
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(rpc_addr = %addr, "System ready. Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 6. Graceful shutdown
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    shutdown_tx.shutdown();
    if tokio::time::timeout(SHUTDOWN_TIMEOUT, queue.shutdown())
        .await
        .is_err()
    {
        tracing::warn!("Queue consumer did not stop within {:?}", SHUTDOWN_TIMEOUT);
    }

    let remaining = queue.len();
    if remaining > 0 {
        tracing::warn!(remaining, "Exiting with undelivered items");
    }

    info!("Shutdown complete.");

    Ok(())
}
