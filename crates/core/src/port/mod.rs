// Port Layer - Interfaces between the queue and its callers

pub mod item_handler;
pub mod queue_control;

// Re-exports
pub use item_handler::ItemHandler;
pub use queue_control::{QueueControl, QueueStats};
