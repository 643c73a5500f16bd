//! netdiag-tools — network diagnostic tool registry service
//!
//! Provides a gRPC service for discovering and executing network
//! diagnostics. All tool calls go through the execution pipeline:
//! validate input → rate limit → execute.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tonic::transport::Server;
use tracing::info;

use netdiag_tools::config;
use netdiag_tools::executor::Executor;
use netdiag_tools::net;
use netdiag_tools::proto::tools::tool_registry_server::ToolRegistryServer;
use netdiag_tools::registry::Registry;
use netdiag_tools::server::ToolService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .compact()
        .init();

    info!("netdiag tool registry starting...");

    let cfg = config::load_config()?;

    let mut registry = Registry::new();
    net::register_tools(&mut registry);
    info!("Registered {} built-in tools", registry.tool_count());

    let executor = Executor::new(cfg.limits.agent_rps, cfg.limits.tool_rps);
    let service = ToolService::new(registry, executor);

    let addr: SocketAddr = cfg
        .server
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address {}", cfg.server.listen_addr))?;
    info!("Tool registry gRPC server listening on {addr}");

    Server::builder()
        .add_service(ToolRegistryServer::new(service))
        .serve(addr)
        .await
        .context("Tool registry gRPC server failed")?;

    Ok(())
}
