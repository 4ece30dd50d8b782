//! db-results - Buffered SQL query results with text and HTML table output.
//!
//! This library exposes the core modules for the `dbresults` binary and for
//! integration tests.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod query;
pub mod render;
