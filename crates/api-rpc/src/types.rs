//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use batchq_core::port::QueueStats;
use serde::{Deserialize, Serialize};

/// queue.push.v1 - Enqueue one item
#[derive(Debug, Deserialize)]
pub struct PushRequest {
    pub item: serde_json::Value,
    /// Insert ahead of everything already queued
    #[serde(default)]
    pub front: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushResponse {
    pub len: usize,
}

/// queue.peek.v1 - Front items without removing them
#[derive(Debug, Default, Deserialize)]
pub struct PeekRequest {
    /// Maximum items to return; missing, zero or negative means all
    #[serde(default)]
    pub l: i64,
}

/// queue.clear.v1 - Drop every queued item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResponse {
    pub discarded: usize,
}

/// queue.stats.v1 - Counters plus server uptime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub queue: QueueStats,
    pub uptime_seconds: u64,
}
