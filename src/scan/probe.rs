//! Single-port TCP connect probing.

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::scan::ProbeOutcome;

/// Attempt exactly one TCP connection to `host:port` within `timeout`.
///
/// Resolution failures, refusals, timeouts, and unreachable hosts are all
/// folded into the outcome's error text; this function never fails its
/// caller. A successful connection is dropped immediately, no data is
/// exchanged.
pub fn probe(host: &str, port: u16, timeout: Duration) -> ProbeOutcome {
    let addr = match resolve(host, port) {
        Ok(addr) => addr,
        Err(e) => return failed(port, e),
    };

    match TcpStream::connect_timeout(&addr, timeout) {
        Ok(_stream) => ProbeOutcome {
            port,
            open: true,
            error: None,
        },
        Err(e) => failed(port, e),
    }
}

// One connect attempt per port means one address: take the first the
// resolver yields.
fn resolve(host: &str, port: u16) -> io::Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no addresses resolved"))
}

fn failed(port: u16, err: io::Error) -> ProbeOutcome {
    ProbeOutcome {
        port,
        open: false,
        error: Some(format!("port {port}: {err}")),
    }
}
