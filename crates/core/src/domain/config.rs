// Queue Configuration

use super::constants::{
    DEFAULT_CAPACITY, DEFAULT_CATCH_UP_INTERVAL, DEFAULT_DRAIN_BATCH_SIZE, DEFAULT_IDLE_INTERVAL,
};
use std::time::Duration;

/// Fixed configuration of a queue, captured at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Maximum number of queued items
    pub capacity: usize,
    /// Maximum items removed per drain cycle
    pub drain_batch_size: usize,
    /// Consumer sleep while backlog fits in one batch
    pub idle_interval: Duration,
    /// Consumer sleep while backlog exceeds one batch
    pub catch_up_interval: Duration,
}

impl QueueConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Replace zero batch size and zero intervals with their defaults.
    ///
    /// Capacity is kept as given: a zero-capacity queue rejects every push.
    pub fn normalized(mut self) -> Self {
        if self.drain_batch_size == 0 {
            self.drain_batch_size = DEFAULT_DRAIN_BATCH_SIZE;
        }
        if self.idle_interval.is_zero() {
            self.idle_interval = DEFAULT_IDLE_INTERVAL;
        }
        if self.catch_up_interval.is_zero() {
            self.catch_up_interval = DEFAULT_CATCH_UP_INTERVAL;
        }
        self
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            drain_batch_size: DEFAULT_DRAIN_BATCH_SIZE,
            idle_interval: DEFAULT_IDLE_INTERVAL,
            catch_up_interval: DEFAULT_CATCH_UP_INTERVAL,
        }
    }
}
