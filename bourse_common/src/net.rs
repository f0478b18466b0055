//! Shared networking constants and helpers used by client and server.

/// HTTP port the server listens on when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 54321;

/// Route of the simulated Casablanca batch endpoint.
pub const BOURSE_ROUTE: &str = "/casablanca-bourse";

/// Helper to format an address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}
