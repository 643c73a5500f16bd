//! net.configs — local interface configuration pass-through

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::process::Command;

const INPUT_SCHEMA: &str = r#"{"type": "object"}"#;

#[derive(Deserialize)]
struct Input {}

#[derive(Serialize)]
struct Output {
    status: String,
    network_configs: String,
}

pub fn input_schema() -> Vec<u8> {
    INPUT_SCHEMA.as_bytes().to_vec()
}

/// Capture the platform interface-listing command's stdout verbatim.
///
/// The command's own exit code is irrelevant; only a failure to spawn it is
/// reported, and as data (`status: "error"`) rather than as a handler error.
/// No parsing or interpretation of the text happens here.
pub fn execute(input: &[u8]) -> Result<Vec<u8>> {
    let _input: Input = if input.is_empty() {
        Input {}
    } else {
        serde_json::from_slice(input).context("Invalid JSON input")?
    };

    let result = if cfg!(target_os = "macos") {
        Command::new("ifconfig").output()
    } else {
        Command::new("ip").args(["addr", "show"]).output()
    };

    let output = match result {
        Ok(out) => Output {
            status: "success".to_string(),
            network_configs: String::from_utf8_lossy(&out.stdout).into_owned(),
        },
        Err(e) => Output {
            status: "error".to_string(),
            network_configs: e.to_string(),
        },
    };

    serde_json::to_vec(&output).context("Failed to serialize output")
}
