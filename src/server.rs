//! gRPC surface for tool discovery and execution

use std::sync::Arc;
use tokio::sync::Mutex;
use tonic::{Request, Response, Status};
use tracing::info;

use crate::executor::Executor;
use crate::proto::tools::tool_registry_server::ToolRegistry;
use crate::proto::tools::{
    DeregisterToolRequest, DeregisterToolResponse, ExecuteRequest, ExecuteResponse,
    GetToolRequest, ListToolsRequest, ListToolsResponse, RegisterToolRequest,
    RegisterToolResponse, ToolDefinition,
};
use crate::registry::Registry;

/// Tool registry service exposed to automated callers.
pub struct ToolService {
    registry: Arc<Mutex<Registry>>,
    executor: Arc<Executor>,
}

impl ToolService {
    pub fn new(registry: Registry, executor: Executor) -> Self {
        Self {
            registry: Arc::new(Mutex::new(registry)),
            executor: Arc::new(executor),
        }
    }
}

#[tonic::async_trait]
impl ToolRegistry for ToolService {
    async fn list_tools(
        &self,
        request: Request<ListToolsRequest>,
    ) -> Result<Response<ListToolsResponse>, Status> {
        let req = request.into_inner();
        let registry = self.registry.lock().await;

        Ok(Response::new(ListToolsResponse {
            tools: registry.list_tools(&req.namespace),
        }))
    }

    async fn get_tool(
        &self,
        request: Request<GetToolRequest>,
    ) -> Result<Response<ToolDefinition>, Status> {
        let req = request.into_inner();
        let registry = self.registry.lock().await;

        registry
            .get_tool(&req.name)
            .ok_or_else(|| Status::not_found(format!("Tool not found: {}", req.name)))
            .map(Response::new)
    }

    async fn execute(
        &self,
        request: Request<ExecuteRequest>,
    ) -> Result<Response<ExecuteResponse>, Status> {
        let req = request.into_inner();
        info!(
            "Executing tool: {} (agent: {}, reason: {})",
            req.tool_name, req.agent_id, req.reason
        );

        // Clone the definition out of the lock so a long-running scan does
        // not block discovery calls.
        let tool = {
            let registry = self.registry.lock().await;
            registry.get_tool(&req.tool_name)
        };

        Ok(Response::new(self.executor.execute(tool, req).await))
    }

    async fn register(
        &self,
        request: Request<RegisterToolRequest>,
    ) -> Result<Response<RegisterToolResponse>, Status> {
        let req = request.into_inner();
        let tool = req
            .tool
            .ok_or_else(|| Status::invalid_argument("Missing tool definition"))?;

        info!("Registering external tool: {}", tool.name);

        let mut registry = self.registry.lock().await;
        registry.register_tool(tool);

        Ok(Response::new(RegisterToolResponse {
            accepted: true,
            error: String::new(),
        }))
    }

    async fn deregister(
        &self,
        request: Request<DeregisterToolRequest>,
    ) -> Result<Response<DeregisterToolResponse>, Status> {
        let req = request.into_inner();
        let mut registry = self.registry.lock().await;
        registry.deregister_tool(&req.tool_name);

        Ok(Response::new(DeregisterToolResponse {
            success: true,
            message: format!("Tool {} deregistered", req.tool_name),
        }))
    }
}
