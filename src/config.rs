//! Service configuration loading and parsing

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "/etc/netdiag/config.toml";

/// Root configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

/// Token-bucket refill rates for the executor
#[derive(Debug, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_agent_rps")]
    pub agent_rps: f64,
    #[serde(default = "default_tool_rps")]
    pub tool_rps: f64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            agent_rps: default_agent_rps(),
            tool_rps: default_tool_rps(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:50061".into()
}
fn default_agent_rps() -> f64 {
    10.0
}
fn default_tool_rps() -> f64 {
    50.0
}

/// Load configuration from $NETDIAG_CONFIG or /etc/netdiag/config.toml
pub fn load_config() -> Result<ServiceConfig> {
    let config_path =
        std::env::var("NETDIAG_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_from(Path::new(&config_path))
}

/// Load configuration from a specific path, defaulting when absent
pub fn load_from(path: &Path) -> Result<ServiceConfig> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: ServiceConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    } else {
        tracing::warn!("Config file not found at {}, using defaults", path.display());
        Ok(ServiceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.listen_addr, "0.0.0.0:50061");
        assert_eq!(config.limits.agent_rps, 10.0);
        assert_eq!(config.limits.tool_rps, 50.0);
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
[server]
listen_addr = "127.0.0.1:9000"
"#;
        let config: ServiceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.limits.agent_rps, 10.0);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[server]
listen_addr = "0.0.0.0:50070"

[limits]
agent_rps = 2.5
tool_rps = 20.0
"#;
        let config: ServiceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen_addr, "0.0.0.0:50070");
        assert_eq!(config.limits.agent_rps, 2.5);
        assert_eq!(config.limits.tool_rps, 20.0);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[limits]\nagent_rps = 1.0\n").unwrap();

        let config = load_from(file.path()).unwrap();
        assert_eq!(config.limits.agent_rps, 1.0);
        assert_eq!(config.server.listen_addr, "0.0.0.0:50061");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_from(Path::new("/nonexistent/netdiag.toml")).unwrap();
        assert_eq!(config.server.listen_addr, "0.0.0.0:50061");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not toml [[[").unwrap();

        assert!(load_from(file.path()).is_err());
    }
}
