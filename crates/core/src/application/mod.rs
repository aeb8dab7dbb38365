// Application Layer - Queue operations, drain and background consumer

pub mod consumer;
pub mod drain;
pub mod inspect;
pub mod queue;

// Re-exports
pub use consumer::{next_interval, shutdown_channel, ShutdownSender, ShutdownToken};
pub use drain::DrainReport;
pub use queue::{Queue, QueueBuilder};
