//! HTTP server utility methods

use crate::server::server::HttpServer;
use crate::utils::error::AppError;
use std::io::ErrorKind;

impl HttpServer {
    /// Readable error for a failed bind
    pub(crate) fn format_bind_error(error: std::io::Error, bind_addr: &str, port: u16) -> AppError {
        let message = match error.kind() {
            ErrorKind::AddrInUse => format!(
                "Port {} is already in use. Stop the other process (lsof -i:{}) or set PORT={}",
                port,
                port,
                port.saturating_add(1)
            ),
            ErrorKind::PermissionDenied => format!(
                "Permission denied for port {}. Use a port >= 1024, e.g. PORT=3000",
                port
            ),
            _ => format!("Failed to bind to {}: {}", bind_addr, error),
        };
        AppError::config(message)
    }
}
