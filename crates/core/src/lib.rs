// Batchq Core - Queue store, drain and background consumer
// NO transport dependencies: RPC and binaries live in their own crates

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{Queue, QueueBuilder};
pub use domain::{QueueConfig, QueueError};
pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
