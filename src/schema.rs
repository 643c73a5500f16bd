//! JSON Schema validation for tool inputs

use anyhow::{bail, Result};

/// Validate JSON input bytes against a tool's JSON Schema.
///
/// An empty schema means the tool is unvalidated. Empty input is treated as
/// an empty object, so no-argument tools pass object-typed schemas.
pub fn validate_input(input: &[u8], schema_bytes: &[u8]) -> Result<()> {
    if schema_bytes.is_empty() {
        return Ok(());
    }

    let input_value = parse_input(input)?;
    let schema_value: serde_json::Value = serde_json::from_slice(schema_bytes)
        .map_err(|e| anyhow::anyhow!("Invalid JSON schema: {e}"))?;

    let validator = jsonschema::validator_for(&schema_value)
        .map_err(|e| anyhow::anyhow!("Invalid JSON schema: {e}"))?;

    if let Err(error) = validator.validate(&input_value) {
        bail!("Input validation failed: {error}");
    }

    Ok(())
}

/// Parse JSON input bytes, treating empty input as `{}`.
pub fn parse_input(input: &[u8]) -> Result<serde_json::Value> {
    if input.is_empty() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    serde_json::from_slice(input).map_err(|e| anyhow::anyhow!("Invalid JSON input: {e}"))
}
