//! JSON-RPC Server
//!
//! Serves the queue control methods over HTTP on a local TCP port.

use crate::handler::RpcHandler;
use crate::types::{PeekRequest, PushRequest};
use batchq_core::port::QueueControl;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9630;

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub host: String,
    /// `0` picks a free port (see the address returned by `start`)
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, queue: Arc<dyn QueueControl>) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(queue)),
        }
    }

    /// Start the JSON-RPC server, returning its bound address and handle
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let mut module = RpcModule::new(());

        // Register methods
        let handler = self.handler.clone();
        module
            .register_async_method("queue.push.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: PushRequest = params.parse()?;
                    handler.push(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.pop.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.pop().await }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.peek.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    // `l` is optional, and so is the whole params object
                    let req: Option<PeekRequest> = params.parse()?;
                    handler.peek(req.unwrap_or_default()).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.clear.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.clear().await }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.stats.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.stats().await }
            })
            .map_err(|e| e.to_string())?;

        info!(addr = %local_addr, "JSON-RPC server started");

        let handle = server.start(module);
        Ok((local_addr, handle))
    }
}
