//! Tool registry — stores and retrieves tool definitions

use std::collections::HashMap;
use tracing::info;

use crate::proto::tools::ToolDefinition;

/// In-memory tool registry
#[derive(Default)]
pub struct Registry {
    tools: HashMap<String, ToolDefinition>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool definition, replacing any previous one with the name
    pub fn register_tool(&mut self, tool: ToolDefinition) {
        info!("Registered tool: {} (ns: {})", tool.name, tool.namespace);
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<ToolDefinition> {
        self.tools.get(name).cloned()
    }

    /// List tools, optionally filtered by namespace
    pub fn list_tools(&self, namespace: &str) -> Vec<ToolDefinition> {
        if namespace.is_empty() {
            self.tools.values().cloned().collect()
        } else {
            self.tools
                .values()
                .filter(|t| t.namespace == namespace)
                .cloned()
                .collect()
        }
    }

    /// Deregister a tool
    pub fn deregister_tool(&mut self, name: &str) {
        self.tools.remove(name);
    }

    /// Get total tool count
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }
}

/// Helper to create a ToolDefinition
pub fn make_tool(
    name: &str,
    namespace: &str,
    description: &str,
    input_schema: Vec<u8>,
    risk_level: &str,
    idempotent: bool,
    timeout_ms: i32,
) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        namespace: namespace.to_string(),
        version: "1.0.0".to_string(),
        description: description.to_string(),
        input_schema,
        output_schema: vec![],
        risk_level: risk_level.to_string(),
        requires_confirmation: risk_level == "critical",
        idempotent,
        timeout_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tool(name: &str, namespace: &str) -> ToolDefinition {
        make_tool(name, namespace, "A test tool", vec![], "low", true, 5000)
    }

    #[test]
    fn register_and_get_tool() {
        let mut reg = Registry::new();
        reg.register_tool(sample_tool("net.configs", "net"));

        let tool = reg.get_tool("net.configs").unwrap();
        assert_eq!(tool.name, "net.configs");
        assert_eq!(tool.namespace, "net");
        assert_eq!(tool.version, "1.0.0");
    }

    #[test]
    fn get_nonexistent_tool() {
        let reg = Registry::new();
        assert!(reg.get_tool("nonexistent").is_none());
    }

    #[test]
    fn list_tools_by_namespace() {
        let mut reg = Registry::new();
        reg.register_tool(sample_tool("net.configs", "net"));
        reg.register_tool(sample_tool("net.scan_ports", "net"));
        reg.register_tool(sample_tool("dns.lookup", "dns"));

        assert_eq!(reg.list_tools("").len(), 3);
        assert_eq!(reg.list_tools("net").len(), 2);
        assert_eq!(reg.list_tools("dns").len(), 1);
        assert!(reg.list_tools("nonexistent").is_empty());
    }

    #[test]
    fn deregister_tool() {
        let mut reg = Registry::new();
        reg.register_tool(sample_tool("net.configs", "net"));
        assert_eq!(reg.tool_count(), 1);

        reg.deregister_tool("net.configs");
        assert_eq!(reg.tool_count(), 0);
        assert!(reg.get_tool("net.configs").is_none());

        // Removing an unknown name is a no-op
        reg.deregister_tool("net.configs");
    }

    #[test]
    fn register_overwrites_existing() {
        let mut reg = Registry::new();
        reg.register_tool(make_tool(
            "net.scan_ports",
            "net",
            "Original description",
            vec![],
            "low",
            true,
            5000,
        ));
        reg.register_tool(make_tool(
            "net.scan_ports",
            "net",
            "Updated description",
            vec![],
            "medium",
            true,
            10000,
        ));

        assert_eq!(reg.tool_count(), 1);
        let tool = reg.get_tool("net.scan_ports").unwrap();
        assert_eq!(tool.description, "Updated description");
        assert_eq!(tool.risk_level, "medium");
        assert_eq!(tool.timeout_ms, 10000);
    }

    #[test]
    fn critical_risk_requires_confirmation() {
        let tool = make_tool("net.flush", "net", "Flush state", vec![], "critical", false, 30000);
        assert!(tool.requires_confirmation);

        let tool = make_tool("net.configs", "net", "Read configs", vec![], "low", true, 5000);
        assert!(!tool.requires_confirmation);
    }

    #[test]
    fn make_tool_carries_schema_bytes() {
        let schema = br#"{"type":"object"}"#.to_vec();
        let tool = make_tool("net.configs", "net", "Read configs", schema.clone(), "low", true, 5000);
        assert_eq!(tool.input_schema, schema);
        assert!(tool.output_schema.is_empty());
    }
}
