//! Network diagnostic tools — interface configs and port scanning.
//!
//! Each submodule exposes `pub fn execute(input: &[u8]) -> Result<Vec<u8>>`.

pub mod configs;
pub mod scan_ports;

use crate::registry::{make_tool, Registry};

/// Register every network tool with the registry.
pub fn register_tools(reg: &mut Registry) {
    reg.register_tool(make_tool(
        "net.configs",
        "net",
        "Read the local network interface configuration as raw output of the platform's interface-listing command",
        configs::input_schema(),
        "low",
        true,
        5000,
    ));

    reg.register_tool(make_tool(
        "net.scan_ports",
        "net",
        "TCP connect scan of a single host over an explicit port list or an inclusive port range",
        scan_ports::input_schema(),
        "medium",
        true,
        600_000,
    ));
}
