//! JSON-RPC API Layer
//!
//! Exposes a queue's inspection/trigger surface as JSON-RPC 2.0 methods
//! (`queue.pop.v1`, `queue.peek.v1`, ...), independent of the payload type.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::RpcServer;
