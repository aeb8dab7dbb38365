//! Batchq CLI - Command-line client for the Batchq daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9630";

#[derive(Parser)]
#[command(name = "batchq")]
#[command(about = "Batchq queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "BATCHQ_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Push an item (JSON) onto the queue
    Push {
        /// Item as JSON, e.g. '{"id": 1}'
        item: String,

        /// Insert ahead of every queued item
        #[arg(long)]
        front: bool,
    },

    /// Drain one batch now and print how many items were removed
    Pop,

    /// Show front items without removing them
    Peek {
        /// Maximum items to show (0 or negative = all)
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        limit: i64,
    },

    /// Drop every queued item
    Clear,

    /// Show queue status
    Status,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct StatsRow {
    len: usize,
    capacity: usize,
    drain_batch_size: usize,
    drained_total: u64,
    handler_failures: u64,
    cycles: u64,
    rejected_total: u64,
    uptime_seconds: u64,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Push { item, front } => {
            let item_json: serde_json::Value =
                serde_json::from_str(&item).context("Invalid JSON item")?;

            let params = json!({ "item": item_json, "front": front });
            let result = call_rpc(&cli.rpc_url, "queue.push.v1", params).await?;

            let position = if front { "front" } else { "back" };
            println!(
                "{} (queue length: {})",
                format!("✓ Item pushed to {}", position).green().bold(),
                result["len"]
            );
        }

        Commands::Pop => {
            let result = call_rpc(&cli.rpc_url, "queue.pop.v1", json!([])).await?;
            println!("{}", result);
        }

        Commands::Peek { limit } => {
            let result = call_rpc(&cli.rpc_url, "queue.peek.v1", json!({ "l": limit })).await?;
            let items = result.as_array().cloned().unwrap_or_default();

            if items.is_empty() {
                println!("{}", "Queue is empty".yellow());
            } else {
                println!("{}", format!("Front {} item(s):", items.len()).cyan().bold());
                for (i, item) in items.iter().enumerate() {
                    println!("  {:>4}  {}", i, item);
                }
            }
        }

        Commands::Clear => {
            let result = call_rpc(&cli.rpc_url, "queue.clear.v1", json!([])).await?;
            println!(
                "{}",
                format!("✓ {} item(s) discarded", result["discarded"]).green().bold()
            );
        }

        Commands::Status => {
            println!("{}", "Queue Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "queue.stats.v1", json!([])).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();

                    let row: StatsRow = serde_json::from_value(stats)?;
                    println!("{}", Table::new(vec![row]));
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
