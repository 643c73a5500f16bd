//! Port set building and scan request validation.

use std::collections::BTreeSet;
use thiserror::Error;

use crate::scan::PortSpec;

/// Validation failures that abort a scan before any probing begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("either ports or port_range must be provided")]
    MissingPortSource,
    #[error("invalid ports; ports must be between 1 and 65535")]
    InvalidPort,
    #[error("invalid port_range; ports must be between 1 and 65535")]
    InvalidPortRange,
    #[error("timeout_seconds must be positive")]
    InvalidTimeout,
    #[error("max_workers must be positive")]
    InvalidWorkers,
}

/// Resolve a port spec into a deduplicated, validated set.
///
/// Explicit lists may be empty (an empty scan is legal and yields an empty
/// report) and are collapsed to distinct ports before dispatch. Ranges are
/// inclusive and must stay within [1, 65535]. Port 0 is the one value a
/// `u16` admits that is not a scannable port.
pub fn build_port_set(spec: &PortSpec) -> Result<BTreeSet<u16>, ScanError> {
    match spec {
        PortSpec::Explicit(ports) => {
            if ports.contains(&0) {
                return Err(ScanError::InvalidPort);
            }
            Ok(ports.iter().copied().collect())
        }
        PortSpec::Range(start, end) => {
            if *start == 0 || *end == 0 || start > end {
                return Err(ScanError::InvalidPortRange);
            }
            Ok((*start..=*end).collect())
        }
    }
}
