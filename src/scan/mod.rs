//! Concurrent TCP connect scanning.
//!
//! A scan request is resolved into a deduplicated port set, probed under a
//! bounded worker budget with a per-connection timeout, and aggregated into
//! a deterministic, JSON-serializable report. Everything here is scoped to
//! one call; no state survives the returned report.

pub mod pool;
pub mod ports;
pub mod probe;

use serde::Serialize;
use std::time::Duration;

use crate::scan::ports::{build_port_set, ScanError};

/// Caller-supplied port selection, resolved once before dispatch.
#[derive(Debug, Clone)]
pub enum PortSpec {
    /// Literal list of ports to probe
    Explicit(Vec<u16>),
    /// Inclusive range `start..=end`
    Range(u16, u16),
}

/// Immutable input for one scan call.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub host: String,
    pub spec: PortSpec,
    pub timeout_seconds: f64,
    pub max_workers: usize,
}

/// Result of probing a single port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub port: u16,
    pub open: bool,
    /// Diagnostic text, present only when the probe did not connect
    pub error: Option<String>,
}

/// Final scan report as returned to tool callers.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ScanReport {
    pub target: String,
    pub open_ports: Vec<u16>,
    pub closed_or_filtered: Vec<u16>,
    pub errors: Vec<String>,
}

/// Run a full scan: validate, build the port set, probe, aggregate.
///
/// `ScanError` is the only failure that aborts the call, and it is raised
/// before any probe is dispatched. Socket-level failures are data in the
/// report, never errors.
pub fn run(request: &ScanRequest) -> Result<ScanReport, ScanError> {
    let timeout = Duration::try_from_secs_f64(request.timeout_seconds)
        .ok()
        .filter(|t| !t.is_zero())
        .ok_or(ScanError::InvalidTimeout)?;
    if request.max_workers == 0 {
        return Err(ScanError::InvalidWorkers);
    }

    let ports = build_port_set(&request.spec)?;
    let outcomes = pool::scan_all(&request.host, &ports, timeout, request.max_workers);
    Ok(aggregate(&request.host, outcomes))
}

/// Partition probe outcomes into the final report.
///
/// Port lists are sorted ascending. Error strings keep the order outcomes
/// completed in, with exact duplicates dropped after their first occurrence.
pub fn aggregate(host: &str, outcomes: Vec<ProbeOutcome>) -> ScanReport {
    let mut open_ports = Vec::new();
    let mut closed_or_filtered = Vec::new();
    let mut errors: Vec<String> = Vec::new();

    for outcome in outcomes {
        if outcome.open {
            open_ports.push(outcome.port);
        } else {
            closed_or_filtered.push(outcome.port);
            if let Some(err) = outcome.error {
                if !errors.contains(&err) {
                    errors.push(err);
                }
            }
        }
    }

    open_ports.sort_unstable();
    closed_or_filtered.sort_unstable();

    ScanReport {
        target: host.to_string(),
        open_ports,
        closed_or_filtered,
        errors,
    }
}
