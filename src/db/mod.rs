//! Database access layer for db-results.
//!
//! Opens single connections with the `sqlx` driver that matches the
//! configured vendor.

mod connection;
mod provision;
mod results;
mod vendor;

pub use connection::DbConnection;
pub(crate) use connection::TextRow;
pub(crate) use provision::is_valid_table_name;
pub use provision::TableProvisioner;
pub use results::{Cell, QueryResults, Row, TableModel};
pub use vendor::Vendor;

use crate::config::ConnectionConfig;
use crate::error::{ResultsError, Result};
use tracing::debug;

/// Opens a connection described by `config`.
///
/// Resolves the vendor's driver first, so a vendor without a driver fails
/// with `UnsupportedVendor` before any network traffic.
pub async fn connect(config: &ConnectionConfig) -> Result<DbConnection> {
    let driver = config.vendor.driver()?;
    let url = config.to_connection_url()?;
    debug!(driver, connection = %config.display_string(), "Opening connection");

    DbConnection::open(config.vendor, &url)
        .await
        .map_err(|e| map_connection_error(e, config))
}

/// Opens a connection from a raw driver URL.
pub async fn connect_url(url: &str) -> Result<DbConnection> {
    let config = ConnectionConfig::from_connection_string(url)?;
    let driver = config.vendor.driver()?;
    debug!(driver, connection = %config.display_string(), "Opening connection");

    DbConnection::open(config.vendor, url)
        .await
        .map_err(|e| map_connection_error(e, &config))
}

/// Maps sqlx connection errors to user-friendly messages.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> ResultsError {
    let host = config.host.as_deref().unwrap_or("localhost");
    let port = config
        .port
        .or(config.vendor.default_port())
        .map(|p| format!(":{p}"))
        .unwrap_or_default();
    let user = config.user.as_deref().unwrap_or("unknown");
    let database = config.database.as_deref().unwrap_or("unknown");

    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        ResultsError::connection(format!(
            "Cannot connect to {host}{port}. Check that the server is running."
        ))
    } else if error_str.contains("authentication failed") || error_str.contains("access denied")
    {
        ResultsError::connection(format!(
            "Authentication failed for user '{user}'. Check your credentials."
        ))
    } else if error_str.contains("does not exist") && error_str.contains("database") {
        ResultsError::connection(format!("Database '{database}' does not exist."))
    } else if error_str.contains("unable to open database file") {
        ResultsError::connection(format!("Cannot open database file '{database}'."))
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        ResultsError::connection(format!(
            "Connection to {host}{port} timed out. The server may be overloaded or unreachable."
        ))
    } else {
        ResultsError::connection(error.to_string())
    }
}
