//! Query execution for db-results.
//!
//! This module turns one SQL statement into a fully buffered
//! [`QueryResults`](crate::db::QueryResults).

pub mod executor;

pub use executor::QueryExecutor;
