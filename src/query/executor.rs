//! Query execution into buffered results.
//!
//! Runs one statement, reads the product and column metadata, and drains the
//! cursor into a [`QueryResults`], converting every cell to trimmed text.
//! A failure at any point yields an error and no partial result.

use crate::config::ConnectionConfig;
use crate::db::{self, DbConnection, QueryResults, Row, TextRow};
use crate::error::{ResultsError, Result};
use futures::TryStreamExt;
use sqlx::{Column as _, Executor as _, Statement as _};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Runs queries and buffers their results.
#[derive(Debug, Clone, Default)]
pub struct QueryExecutor {
    statement_timeout: Option<Duration>,
}

impl QueryExecutor {
    /// Creates an executor with no statement timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits how long executing a statement and draining its rows may take.
    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = Some(timeout);
        self
    }

    pub fn statement_timeout(&self) -> Option<Duration> {
        self.statement_timeout
    }

    /// Connects with `config` and runs `sql`.
    ///
    /// With `close_after` the connection is closed before returning, whether
    /// or not the query succeeded. Otherwise it is kept on the returned
    /// result for the caller to close.
    pub async fn run(
        &self,
        config: &ConnectionConfig,
        sql: &str,
        close_after: bool,
    ) -> Result<QueryResults> {
        let conn = db::connect(config).await?;
        self.run_with_connection(conn, sql, close_after).await
    }

    /// Runs `sql` on an already open connection, taking ownership of it.
    ///
    /// `close_after` behaves as in [`QueryExecutor::run`]. If the query fails
    /// and `close_after` is false the connection is dropped.
    pub async fn run_with_connection(
        &self,
        mut conn: DbConnection,
        sql: &str,
        close_after: bool,
    ) -> Result<QueryResults> {
        let outcome = self.fetch(&mut conn, sql).await;

        if close_after {
            debug!("Closing connection");
            if let Err(e) = conn.close().await {
                warn!("Failed to close connection: {e}");
            }
            return outcome;
        }

        let mut results = outcome?;
        results.retain_connection(conn);
        Ok(results)
    }

    /// Runs `sql` on a borrowed connection. The connection is never closed.
    pub async fn fetch(&self, conn: &mut DbConnection, sql: &str) -> Result<QueryResults> {
        let (product_name, product_version) = product_metadata(conn).await?;

        let start = Instant::now();
        let drain = execute_and_drain(conn, sql, product_name, product_version);
        let results = match self.statement_timeout {
            Some(limit) => tokio::time::timeout(limit, drain).await.map_err(|_| {
                ResultsError::timeout(format!(
                    "Query did not finish within {} ms",
                    limit.as_millis()
                ))
            })??,
            None => drain.await?,
        };

        debug!(
            rows = results.row_count(),
            columns = results.column_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Query finished"
        );
        Ok(results)
    }

    /// Fetches every row of `table`.
    pub async fn fetch_table(&self, conn: &mut DbConnection, table: &str) -> Result<QueryResults> {
        if !db::is_valid_table_name(table) {
            return Err(ResultsError::invalid_argument(format!(
                "'{table}' is not a valid table name"
            )));
        }
        self.fetch(conn, &format!("SELECT * FROM {table}")).await
    }
}

/// Prepares `$sql` on a concrete connection for its column names, then drains
/// every row as text. A statement without result columns is rejected before
/// it runs.
macro_rules! drain_text {
    ($conn:expr, $sql:expr) => {{
        let statement = (&mut *$conn)
            .prepare($sql)
            .await
            .map_err(|e| ResultsError::query(format_query_error(e)))?;
        let column_names: Vec<String> = statement
            .columns()
            .iter()
            .map(|column| column.name().trim().to_string())
            .collect();
        if column_names.is_empty() {
            return Err(ResultsError::query(
                "Statement does not return a result set",
            ));
        }

        let mut rows = Vec::new();
        let mut stream = sqlx::raw_sql($sql).fetch(&mut *$conn);
        while let Some(row) = stream
            .try_next()
            .await
            .map_err(|e| ResultsError::query(format_query_error(e)))?
        {
            rows.push(convert_row(&row, column_names.len())?);
        }
        (column_names, rows)
    }};
}

/// Runs `sql` and returns its column names and every row as text.
async fn fetch_text(conn: &mut DbConnection, sql: &str) -> Result<(Vec<String>, Vec<Row>)> {
    let fetched = match conn {
        DbConnection::Postgres(conn) => drain_text!(conn, sql),
        DbConnection::Mysql(conn) => drain_text!(conn, sql),
        DbConnection::Sqlite(conn) => drain_text!(conn, sql),
    };
    Ok(fetched)
}

/// Reads the product name and version of the connected database.
async fn product_metadata(conn: &mut DbConnection) -> Result<(String, String)> {
    let vendor = conn.vendor();
    let product_name = vendor.product_name().to_string();

    let (_, rows) = fetch_text(conn, vendor.version_query())
        .await
        .map_err(|e| match e {
            ResultsError::Query(msg) => {
                ResultsError::query(format!("Failed to read database version: {msg}"))
            }
            other => other,
        })?;
    let product_version = rows
        .into_iter()
        .next()
        .and_then(|row| row.into_iter().next().flatten())
        .unwrap_or_else(|| "unknown".to_string());

    debug!(%product_name, %product_version, "Read database metadata");
    Ok((product_name, product_version))
}

/// Runs `sql` and buffers the result.
async fn execute_and_drain(
    conn: &mut DbConnection,
    sql: &str,
    product_name: String,
    product_version: String,
) -> Result<QueryResults> {
    let (column_names, rows) = fetch_text(conn, sql).await?;

    let mut results = QueryResults::new(product_name, product_version, column_names)?;
    for row in rows {
        results.add_row(row)?;
    }
    Ok(results)
}

/// Converts a driver row into trimmed text cells.
fn convert_row<R: TextRow>(row: &R, column_count: usize) -> Result<Row> {
    (0..column_count)
        .map(|index| {
            row.text_cell(index)
                .map(|cell| cell.map(|text| text.trim().to_string()))
        })
        .collect()
}

/// Formats a query error with hints if available.
fn format_query_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    let mut result = String::from("ERROR: ");
    result.push_str(db_error.message());

    if let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
        if let Some(detail) = pg_error.detail() {
            result.push_str("\n  DETAIL: ");
            result.push_str(detail);
        }
        if let Some(hint) = pg_error.hint() {
            result.push_str("\n  HINT: ");
            result.push_str(hint);
        }
    }

    result
}
