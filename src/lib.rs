//! netdiag-tools — network diagnostic tool registry
//!
//! A tool registry and execution pipeline exposing network diagnostics to
//! automated callers over a gRPC boundary. The core is a concurrent TCP
//! connect scanner with a bounded worker budget and a deterministic,
//! JSON-serializable report; `net.configs` passes the platform's interface
//! listing through untouched.

pub mod config;
pub mod executor;
pub mod net;
pub mod registry;
pub mod scan;
pub mod schema;
pub mod server;

pub mod proto {
    pub mod tools {
        tonic::include_proto!("netdiag.tools");
    }
}
