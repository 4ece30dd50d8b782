//! Buffered query results.
//!
//! `QueryResults` holds every row of a finished query as strings, together
//! with the column names and the product name and version of the database
//! that produced them. It is filled by one writer and then read, as often as
//! needed, by any number of renderers.

use super::DbConnection;
use crate::error::{ResultsError, Result};
use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// A single cell. `None` is SQL NULL.
pub type Cell = Option<String>;

/// A row of cells, one per column.
pub type Row = Vec<Cell>;

/// The complete, in-memory result of one query.
///
/// Column names and product metadata are fixed at construction; only the
/// row sequence grows, through [`QueryResults::add_row`]. There is no
/// internal synchronisation for row appends: finish appending before sharing
/// the value with readers. Once appending is done the value is `Sync` and
/// can be read from several threads through a shared reference.
#[derive(Serialize)]
pub struct QueryResults {
    product_name: String,
    product_version: String,
    column_names: Vec<String>,
    rows: Vec<Row>,

    /// Open connection retained for the caller when it asked not to close it.
    #[serde(skip)]
    connection: Mutex<Option<DbConnection>>,
}

impl QueryResults {
    /// Creates an empty result with the given metadata.
    ///
    /// Fails with `InvalidArgument` if `column_names` is empty.
    pub fn new(
        product_name: impl Into<String>,
        product_version: impl Into<String>,
        column_names: Vec<String>,
    ) -> Result<Self> {
        if column_names.is_empty() {
            return Err(ResultsError::invalid_argument(
                "a result needs at least one column",
            ));
        }

        Ok(Self {
            product_name: product_name.into(),
            product_version: product_version.into(),
            column_names,
            rows: Vec::new(),
            connection: Mutex::new(None),
        })
    }

    /// Appends a row.
    ///
    /// Fails with `InvalidArgument`, leaving the rows untouched, if the row
    /// does not have exactly one cell per column.
    pub fn add_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.column_names.len() {
            return Err(ResultsError::invalid_argument(format!(
                "row has {} cells, expected {}",
                row.len(),
                self.column_names.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Returns the name of the database product that produced this result.
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Returns the version of the database product that produced this result.
    pub fn product_version(&self) -> &str {
        &self.product_version
    }

    pub fn column_count(&self) -> usize {
        self.column_names.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the query produced no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the row at `index`, in the order the rows were added.
    pub fn row(&self, index: usize) -> Result<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice).ok_or_else(|| {
            ResultsError::out_of_range(format!(
                "row {index} (row count {})",
                self.rows.len()
            ))
        })
    }

    /// Returns all rows in insertion order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Keeps `connection` open on this result for the caller to close later.
    pub(crate) fn retain_connection(&mut self, connection: DbConnection) {
        *self
            .connection
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner) = Some(connection);
    }

    /// Returns true if an open connection is still held by this result.
    pub fn has_connection(&self) -> bool {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Hands the retained connection to the caller. Returns `None` once taken.
    pub fn take_connection(&self) -> Option<DbConnection> {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Closes the retained connection, if any. Later calls do nothing.
    pub async fn close_connection(&self) -> Result<()> {
        let Some(connection) = self.take_connection() else {
            return Ok(());
        };
        debug!("Closing retained connection");
        connection
            .close()
            .await
            .map_err(|e| ResultsError::connection(format!("Failed to close connection: {e}")))
    }
}

impl fmt::Debug for QueryResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryResults")
            .field("product_name", &self.product_name)
            .field("product_version", &self.product_version)
            .field("column_names", &self.column_names)
            .field("row_count", &self.rows.len())
            .field("has_connection", &self.has_connection())
            .finish()
    }
}

/// Read-only row/column data provider for grid widgets.
pub trait TableModel {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    /// Returns the heading of column `column`.
    fn column_name(&self, column: usize) -> Result<&str>;

    /// Returns the cell at (`row`, `column`); `None` is SQL NULL.
    fn cell_value(&self, row: usize, column: usize) -> Result<Option<&str>>;
}

impl TableModel for QueryResults {
    fn row_count(&self) -> usize {
        QueryResults::row_count(self)
    }

    fn column_count(&self) -> usize {
        QueryResults::column_count(self)
    }

    fn column_name(&self, column: usize) -> Result<&str> {
        self.column_names
            .get(column)
            .map(String::as_str)
            .ok_or_else(|| {
                ResultsError::out_of_range(format!(
                    "column {column} (column count {})",
                    self.column_names.len()
                ))
            })
    }

    fn cell_value(&self, row: usize, column: usize) -> Result<Option<&str>> {
        let cells = self.row(row)?;
        cells
            .get(column)
            .map(Option::as_deref)
            .ok_or_else(|| {
                ResultsError::out_of_range(format!(
                    "column {column} (column count {})",
                    cells.len()
                ))
            })
    }
}
