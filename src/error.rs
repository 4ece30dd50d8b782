//! Error types for db-results.
//!
//! Defines the main error enum used throughout the crate. Driver-level
//! failures are converted into one of these kinds at the executor and
//! provisioner boundaries, carrying the driver message.

use thiserror::Error;

/// Main error type for db-results operations.
#[derive(Error, Debug)]
pub enum ResultsError {
    /// Driver resolution or connection establishment failed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement execution or metadata retrieval failed.
    #[error("Query error: {0}")]
    Query(String),

    /// The statement did not finish within the configured timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Row or column shape mismatch, or a malformed argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Row or column index lookup outside the result bounds.
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Table provisioning (create or insert) failed.
    #[error("Database error: {0}")]
    Provision(String),

    /// The vendor is unknown or has no driver in this build.
    #[error("Unsupported vendor: {0}")]
    UnsupportedVendor(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure writing rendered output to a sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResultsError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a timeout error with the given message.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Creates an invalid-argument error with the given message.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Creates an out-of-range error with the given message.
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }

    /// Creates a provisioning error with the given message.
    pub fn provision(msg: impl Into<String>) -> Self {
        Self::Provision(msg.into())
    }

    /// Creates an unsupported-vendor error with the given message.
    pub fn unsupported_vendor(msg: impl Into<String>) -> Self {
        Self::UnsupportedVendor(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Timeout(_) => "Timeout",
            Self::InvalidArgument(_) => "Invalid Argument",
            Self::OutOfRange(_) => "Out Of Range",
            Self::Provision(_) => "Database Error",
            Self::UnsupportedVendor(_) => "Unsupported Vendor",
            Self::Config(_) => "Configuration Error",
            Self::Io(_) => "I/O Error",
        }
    }
}

/// Result type alias using ResultsError.
pub type Result<T> = std::result::Result<T, ResultsError>;
