//! Tool execution pipeline
//!
//! Pipeline: validate input against the tool's schema → rate limit →
//! execute the handler on a blocking task → structured response. Every
//! failure mode is folded into the `ExecuteResponse`; the transport layer
//! only sees errors of its own.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::proto::tools::{ExecuteRequest, ExecuteResponse, ToolDefinition};
use crate::schema;

/// Token bucket for rate limiting
struct TokenBucket {
    tokens: f64,
    max_tokens: f64,
    refill_rate: f64, // tokens per second
    last_refill: Instant,
}

impl TokenBucket {
    fn new(max_tokens: f64, refill_rate: f64) -> Self {
        Self {
            tokens: max_tokens,
            max_tokens,
            refill_rate,
            last_refill: Instant::now(),
        }
    }

    fn try_consume(&mut self) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.max_tokens);
        self.last_refill = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Rate limiter with per-agent and per-tool buckets
struct RateLimiter {
    agent_buckets: HashMap<String, TokenBucket>,
    tool_buckets: HashMap<String, TokenBucket>,
    agent_max_rps: f64,
    tool_max_rps: f64,
}

impl RateLimiter {
    fn new(agent_max_rps: f64, tool_max_rps: f64) -> Self {
        Self {
            agent_buckets: HashMap::new(),
            tool_buckets: HashMap::new(),
            agent_max_rps,
            tool_max_rps,
        }
    }

    fn check(&mut self, agent_id: &str, tool_name: &str) -> bool {
        let agent_ok = self
            .agent_buckets
            .entry(agent_id.to_string())
            .or_insert_with(|| TokenBucket::new(self.agent_max_rps * 2.0, self.agent_max_rps))
            .try_consume();

        let tool_ok = self
            .tool_buckets
            .entry(tool_name.to_string())
            .or_insert_with(|| TokenBucket::new(self.tool_max_rps * 2.0, self.tool_max_rps))
            .try_consume();

        agent_ok && tool_ok
    }
}

/// A tool handler function taking and returning JSON bytes
type ToolHandler = Arc<dyn Fn(&[u8]) -> Result<Vec<u8>> + Send + Sync>;

/// Executes tools through the pipeline
pub struct Executor {
    /// Map of tool name → handler function
    handlers: HashMap<String, ToolHandler>,
    rate_limiter: Mutex<RateLimiter>,
}

impl Executor {
    pub fn new(agent_max_rps: f64, tool_max_rps: f64) -> Self {
        let mut executor = Self {
            handlers: HashMap::new(),
            rate_limiter: Mutex::new(RateLimiter::new(agent_max_rps, tool_max_rps)),
        };
        executor.register_handlers();
        executor
    }

    /// Register all built-in tool handlers
    fn register_handlers(&mut self) {
        self.handlers.insert(
            "net.configs".into(),
            Arc::new(|input| crate::net::configs::execute(input)),
        );
        self.handlers.insert(
            "net.scan_ports".into(),
            Arc::new(|input| crate::net::scan_ports::execute(input)),
        );
    }

    /// Execute a tool through the pipeline.
    ///
    /// `tool` is the definition the caller looked up (or `None` for an
    /// unknown name). Handlers block on socket I/O, so they run on a
    /// blocking task rather than on the async runtime.
    pub async fn execute(&self, tool: Option<ToolDefinition>, request: ExecuteRequest) -> ExecuteResponse {
        let execution_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let Some(tool) = tool else {
            return failure(
                execution_id,
                start,
                format!("Unknown tool: {}", request.tool_name),
            );
        };

        if let Err(e) = schema::validate_input(&request.input_json, &tool.input_schema) {
            warn!("Input rejected: tool={} err={e}", request.tool_name);
            return failure(execution_id, start, e.to_string());
        }

        {
            let mut limiter = self
                .rate_limiter
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if !limiter.check(&request.agent_id, &request.tool_name) {
                warn!(
                    "Rate limited: agent={} tool={}",
                    request.agent_id, request.tool_name
                );
                return failure(execution_id, start, "Rate limit exceeded".to_string());
            }
        }

        info!(
            "Executing: agent={} tool={} risk={}",
            request.agent_id, request.tool_name, tool.risk_level
        );

        let Some(handler) = self.handlers.get(&request.tool_name) else {
            return failure(
                execution_id,
                start,
                format!("No handler registered for tool: {}", request.tool_name),
            );
        };

        let handler = Arc::clone(handler);
        let input = request.input_json;
        let joined = tokio::task::spawn_blocking(move || handler(&input)).await;

        match joined {
            Ok(Ok(output)) => ExecuteResponse {
                success: true,
                output_json: output,
                error: String::new(),
                execution_id,
                duration_ms: start.elapsed().as_millis() as i64,
            },
            Ok(Err(e)) => failure(execution_id, start, e.to_string()),
            // Panicked or cancelled blocking task, reported like any other
            // execution failure so the caller still gets a response
            Err(e) => failure(execution_id, start, format!("Tool task failed: {e}")),
        }
    }
}

fn failure(execution_id: String, start: Instant, error: String) -> ExecuteResponse {
    ExecuteResponse {
        success: false,
        output_json: vec![],
        error,
        execution_id,
        duration_ms: start.elapsed().as_millis() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::make_tool;

    fn request(tool: &str, input: serde_json::Value) -> ExecuteRequest {
        ExecuteRequest {
            tool_name: tool.to_string(),
            agent_id: "test-agent".to_string(),
            reason: "unit test".to_string(),
            input_json: serde_json::to_vec(&input).unwrap(),
        }
    }

    #[tokio::test]
    async fn unknown_tool_fails_in_the_response() {
        let executor = Executor::new(100.0, 100.0);
        let response = executor.execute(None, request("net.nope", serde_json::json!({}))).await;

        assert!(!response.success);
        assert!(response.error.contains("Unknown tool"));
        assert!(!response.execution_id.is_empty());
    }

    #[tokio::test]
    async fn schema_violation_is_rejected_before_execution() {
        let executor = Executor::new(100.0, 100.0);
        let tool = make_tool(
            "net.scan_ports",
            "net",
            "scan",
            crate::net::scan_ports::input_schema(),
            "medium",
            true,
            600_000,
        );

        // host is required by the schema
        let response = executor
            .execute(Some(tool), request("net.scan_ports", serde_json::json!({"ports": [80]})))
            .await;

        assert!(!response.success);
        assert!(response.error.contains("Input validation failed"));
    }

    #[tokio::test]
    async fn exhausted_bucket_rate_limits() {
        // Buckets start at 2x the rate; 0.1 rps leaves no whole token
        let executor = Executor::new(0.1, 0.1);
        let tool = make_tool("net.anything", "net", "t", vec![], "low", true, 5000);

        let response = executor
            .execute(Some(tool), request("net.anything", serde_json::json!({})))
            .await;

        assert!(!response.success);
        assert_eq!(response.error, "Rate limit exceeded");
    }

    #[tokio::test]
    async fn unhandled_tool_name_reports_missing_handler() {
        let executor = Executor::new(100.0, 100.0);
        let tool = make_tool("net.anything", "net", "t", vec![], "low", true, 5000);

        let response = executor
            .execute(Some(tool), request("net.anything", serde_json::json!({})))
            .await;

        assert!(!response.success);
        assert!(response.error.contains("No handler registered"));
    }

    #[tokio::test]
    async fn empty_scan_executes_through_the_pipeline() {
        let executor = Executor::new(100.0, 100.0);
        let tool = make_tool(
            "net.scan_ports",
            "net",
            "scan",
            crate::net::scan_ports::input_schema(),
            "medium",
            true,
            600_000,
        );

        let response = executor
            .execute(
                Some(tool),
                request(
                    "net.scan_ports",
                    serde_json::json!({"host": "127.0.0.1", "ports": []}),
                ),
            )
            .await;

        assert!(response.success, "error: {}", response.error);
        let report: serde_json::Value = serde_json::from_slice(&response.output_json).unwrap();
        assert_eq!(report["target"], "127.0.0.1");
        assert_eq!(report["open_ports"], serde_json::json!([]));
    }
}
