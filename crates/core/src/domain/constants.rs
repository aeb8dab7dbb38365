// Queue defaults (no magic values)
use std::time::Duration;

/// Capacity used by `QueueConfig::default()`
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Items removed per drain cycle when the configured size is zero
pub const DEFAULT_DRAIN_BATCH_SIZE: usize = 100;

/// Consumer sleep while backlog stays within one batch (20s)
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_secs(20);

/// Consumer sleep while backlog exceeds one batch (1s)
pub const DEFAULT_CATCH_UP_INTERVAL: Duration = Duration::from_secs(1);
