// Domain Layer - Queue store and its configuration

pub mod config;
pub mod constants;
pub mod error;
pub mod store;

// Re-exports
pub use config::QueueConfig;
pub use error::QueueError;
pub use store::BoundedStore;
