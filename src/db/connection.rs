//! Vendor-specific database connections.
//!
//! Each vendor gets its own `sqlx` connection type, so column types the
//! driver knows about are never rejected by a lowest-common-denominator
//! layer. Statements run through `sqlx::raw_sql`: PostgreSQL and MySQL then
//! answer in their text protocol and SQLite converts any stored value to
//! text on request, so every cell can be read back as a string.

use super::{Cell, Vendor};
use crate::error::{ResultsError, Result};
use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Column, ColumnIndex, Connection, Decode, Row, TypeInfo, ValueRef};

/// An open connection to one of the supported vendors.
#[derive(Debug)]
pub enum DbConnection {
    Postgres(PgConnection),
    Mysql(MySqlConnection),
    Sqlite(SqliteConnection),
}

impl DbConnection {
    /// Opens a connection to `url` with the driver for `vendor`.
    pub(crate) async fn open(vendor: Vendor, url: &str) -> std::result::Result<Self, sqlx::Error> {
        match vendor {
            Vendor::Postgres => Ok(Self::Postgres(PgConnection::connect(url).await?)),
            Vendor::Mysql => Ok(Self::Mysql(MySqlConnection::connect(url).await?)),
            Vendor::Sqlite => Ok(Self::Sqlite(SqliteConnection::connect(url).await?)),
            Vendor::Oracle => Err(sqlx::Error::Configuration(
                "no oracle driver is available in this build".into(),
            )),
        }
    }

    /// Returns the vendor this connection talks to.
    pub fn vendor(&self) -> Vendor {
        match self {
            Self::Postgres(_) => Vendor::Postgres,
            Self::Mysql(_) => Vendor::Mysql,
            Self::Sqlite(_) => Vendor::Sqlite,
        }
    }

    /// Runs a statement that returns no rows, such as DDL or an insert.
    pub async fn execute(&mut self, sql: &str) -> std::result::Result<u64, sqlx::Error> {
        let rows_affected = match self {
            Self::Postgres(conn) => sqlx::raw_sql(sql).execute(conn).await?.rows_affected(),
            Self::Mysql(conn) => sqlx::raw_sql(sql).execute(conn).await?.rows_affected(),
            Self::Sqlite(conn) => sqlx::raw_sql(sql).execute(conn).await?.rows_affected(),
        };
        Ok(rows_affected)
    }

    /// Closes the connection.
    pub async fn close(self) -> std::result::Result<(), sqlx::Error> {
        match self {
            Self::Postgres(conn) => conn.close().await,
            Self::Mysql(conn) => conn.close().await,
            Self::Sqlite(conn) => conn.close().await,
        }
    }
}

/// Row types whose cells can be converted to text.
pub(crate) trait TextRow: Row {
    /// Converts the cell at `index` to text; SQL NULL stays `None`.
    fn text_cell(&self, index: usize) -> Result<Cell>;
}

impl TextRow for PgRow {
    fn text_cell(&self, index: usize) -> Result<Cell> {
        if is_null(self, index)? {
            return Ok(None);
        }

        // Text protocol: booleans arrive as `t`/`f`, bytea as `\x...` hex.
        let text = match self.column(index).type_info().name() {
            "BOOL" => self
                .try_get::<bool, _>(index)
                .map(|v| v.to_string())
                .or_else(|_| raw_text(self, index))?,
            _ => raw_text(self, index)?,
        };
        Ok(Some(text))
    }
}

impl TextRow for MySqlRow {
    fn text_cell(&self, index: usize) -> Result<Cell> {
        if is_null(self, index)? {
            return Ok(None);
        }

        // `BOOLEAN` is `TINYINT(1)` and arrives as `0`/`1`.
        let text = match self.column(index).type_info().name() {
            "BOOLEAN" => self
                .try_get::<bool, _>(index)
                .map(|v| v.to_string())
                .or_else(|_| raw_text(self, index))?,
            _ => raw_text(self, index)?,
        };
        Ok(Some(text))
    }
}

impl TextRow for SqliteRow {
    fn text_cell(&self, index: usize) -> Result<Cell> {
        if is_null(self, index)? {
            return Ok(None);
        }

        // Declared types are affinities only; DATE and DATETIME values are
        // stored as text or numbers and read back as such.
        let text = match self.column(index).type_info().name() {
            "BOOLEAN" => self
                .try_get::<bool, _>(index)
                .map(|v| v.to_string())
                .or_else(|_| raw_text(self, index))?,
            _ => raw_text(self, index)?,
        };
        Ok(Some(text))
    }
}

fn is_null<R>(row: &R, index: usize) -> Result<bool>
where
    R: Row,
    usize: ColumnIndex<R>,
{
    row.try_get_raw(index)
        .map(|value| value.is_null())
        .map_err(|e| ResultsError::query(format!("Failed to read column {index}: {e}")))
}

/// Reads a cell as the driver's text form, falling back to lossy UTF-8 for
/// binary values.
fn raw_text<R>(row: &R, index: usize) -> Result<String>
where
    R: Row,
    usize: ColumnIndex<R>,
    for<'r> String: Decode<'r, R::Database>,
    for<'r> Vec<u8>: Decode<'r, R::Database>,
{
    if let Ok(text) = row.try_get_unchecked::<String, _>(index) {
        return Ok(text);
    }
    row.try_get_unchecked::<Vec<u8>, _>(index)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .map_err(|e| {
            ResultsError::query(format!(
                "Column {index} holds a value that cannot be shown as text: {e}"
            ))
        })
}
