// Queue Control Port (inspection/trigger surface for transports)

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Type-erased control surface over a queue whose items map to JSON.
///
/// Every method is synchronous; `trigger_drain` runs handlers on the
/// calling thread, so async callers should move it to a blocking thread.
pub trait QueueControl: Send + Sync {
    /// Decode `item` and push it to the back (or the front)
    fn push_value(&self, item: serde_json::Value, front: bool) -> Result<()>;

    /// Run one drain cycle with the configured batch size
    fn trigger_drain(&self) -> Result<usize>;

    /// Up to `limit` front items as a JSON array (`0` = all)
    fn inspect(&self, limit: usize) -> Result<serde_json::Value>;

    /// Drop every queued item, returning how many were discarded
    fn clear(&self) -> usize;

    fn stats(&self) -> QueueStats;
}

/// Point-in-time counters for a queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub len: usize,
    pub capacity: usize,
    pub drain_batch_size: usize,
    /// Items removed by all drains so far
    pub drained_total: u64,
    /// Handler invocations that panicked
    pub handler_failures: u64,
    /// Drain cycles run (background and triggered)
    pub cycles: u64,
    /// Pushes rejected with QueueFull
    pub rejected_total: u64,
}
