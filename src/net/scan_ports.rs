//! net.scan_ports — concurrent TCP connect scan of a single host

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::scan::ports::ScanError;
use crate::scan::{self, PortSpec, ScanRequest};

const INPUT_SCHEMA: &str = r#"{
  "type": "object",
  "required": ["host"],
  "properties": {
    "host": {"type": "string"},
    "ports": {"type": "array", "items": {"type": "integer"}},
    "port_range": {"type": "array", "items": {"type": "integer"}, "minItems": 2, "maxItems": 2},
    "timeout_seconds": {"type": "number"},
    "max_workers": {"type": "integer"}
  }
}"#;

#[derive(Deserialize)]
struct Input {
    host: String,
    ports: Option<Vec<u16>>,
    port_range: Option<(u16, u16)>,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: f64,
    #[serde(default = "default_max_workers")]
    max_workers: usize,
}

fn default_timeout_seconds() -> f64 {
    0.5
}

fn default_max_workers() -> usize {
    200
}

pub fn input_schema() -> Vec<u8> {
    INPUT_SCHEMA.as_bytes().to_vec()
}

pub fn execute(input: &[u8]) -> Result<Vec<u8>> {
    let input: Input = serde_json::from_slice(input).context("Invalid JSON input")?;

    // An explicit list wins when both port sources are present.
    let spec = match (input.ports, input.port_range) {
        (Some(ports), _) => PortSpec::Explicit(ports),
        (None, Some((start, end))) => PortSpec::Range(start, end),
        (None, None) => return Err(ScanError::MissingPortSource.into()),
    };

    let request = ScanRequest {
        host: input.host,
        spec,
        timeout_seconds: input.timeout_seconds,
        max_workers: input.max_workers,
    };

    let report = scan::run(&request)?;
    serde_json::to_vec(&report).context("Failed to serialize output")
}
