//! RPC Method Handlers
//!
//! Implements the business logic for each JSON-RPC method.

use crate::error::to_rpc_error;
use crate::types::{ClearResponse, PeekRequest, PushRequest, PushResponse, StatsResponse};
use batchq_core::error::AppError;
use batchq_core::port::QueueControl;
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use tracing::debug;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    queue: Arc<dyn QueueControl>,
    start_time: std::time::Instant,
}

impl RpcHandler {
    pub fn new(queue: Arc<dyn QueueControl>) -> Self {
        Self {
            queue,
            start_time: std::time::Instant::now(),
        }
    }

    /// queue.push.v1
    pub async fn push(&self, params: PushRequest) -> Result<PushResponse, ErrorObjectOwned> {
        self.queue
            .push_value(params.item, params.front)
            .map_err(|e| match e {
                // The payload came from the caller: a decode failure is their mistake
                AppError::Serialization(e) => AppError::Validation(format!("invalid item: {}", e)),
                other => other,
            })
            .map_err(to_rpc_error)?;

        Ok(PushResponse {
            len: self.queue.stats().len,
        })
    }

    /// queue.pop.v1 - one drain cycle now, returns the number of items removed
    pub async fn pop(&self) -> Result<usize, ErrorObjectOwned> {
        // Handlers may block: keep them off the async workers
        let queue = Arc::clone(&self.queue);
        let removed = tokio::task::spawn_blocking(move || queue.trigger_drain())
            .await
            .map_err(|e| to_rpc_error(AppError::Internal(format!("drain task failed: {}", e))))?
            .map_err(to_rpc_error)?;

        debug!(removed, "queue.pop.v1 served");
        Ok(removed)
    }

    /// queue.peek.v1 - JSON array of up to `l` front items
    pub async fn peek(&self, params: PeekRequest) -> Result<serde_json::Value, ErrorObjectOwned> {
        // Non-positive limits mean the whole queue
        let limit = usize::try_from(params.l).unwrap_or(0);
        self.queue.inspect(limit).map_err(to_rpc_error)
    }

    /// queue.clear.v1
    pub async fn clear(&self) -> Result<ClearResponse, ErrorObjectOwned> {
        Ok(ClearResponse {
            discarded: self.queue.clear(),
        })
    }

    /// queue.stats.v1
    pub async fn stats(&self) -> Result<StatsResponse, ErrorObjectOwned> {
        Ok(StatsResponse {
            queue: self.queue.stats(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        })
    }
}
