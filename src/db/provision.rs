//! Fixture table provisioning.
//!
//! Drops a table if it exists, recreates it and fills it with literal rows.
//! Row literals are raw SQL fragments pasted into `VALUES (...)`; this is
//! meant for test fixtures only and must never see untrusted input.

use super::DbConnection;
use crate::error::{ResultsError, Result};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Plain SQL identifier, optionally schema-qualified.
fn table_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*(\.[A-Za-z_][A-Za-z0-9_$]*)?$")
            .expect("table name pattern is valid")
    })
}

/// Returns true if `name` is a plain SQL identifier, optionally schema-qualified.
pub(crate) fn is_valid_table_name(name: &str) -> bool {
    table_name_pattern().is_match(name)
}

/// A table definition plus the literal rows to load into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableProvisioner {
    table_name: String,
    column_definition: String,
    row_literals: Vec<String>,
}

impl TableProvisioner {
    /// Creates a provisioner for `table_name`.
    ///
    /// `column_definition` is the parenthesised column list of the
    /// `CREATE TABLE` statement, e.g. `(id INTEGER, name VARCHAR(20))`.
    pub fn new(table_name: impl Into<String>, column_definition: impl Into<String>) -> Result<Self> {
        let table_name = table_name.into();
        if !is_valid_table_name(&table_name) {
            return Err(ResultsError::invalid_argument(format!(
                "'{table_name}' is not a valid table name"
            )));
        }

        let column_definition = column_definition.into();
        if column_definition.trim().is_empty() {
            return Err(ResultsError::invalid_argument(
                "column definition must not be empty",
            ));
        }

        Ok(Self {
            table_name,
            column_definition,
            row_literals: Vec::new(),
        })
    }

    /// Adds one row literal, e.g. `1, 'Alice'`.
    pub fn row(mut self, literal: impl Into<String>) -> Self {
        self.row_literals.push(literal.into());
        self
    }

    /// Adds several row literals, in order.
    pub fn rows<I, S>(mut self, literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.row_literals
            .extend(literals.into_iter().map(Into::into));
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn row_literals(&self) -> &[String] {
        &self.row_literals
    }

    fn drop_sql(&self) -> String {
        format!("DROP TABLE {}", self.table_name)
    }

    fn create_sql(&self) -> String {
        format!(
            "CREATE TABLE {} {}",
            self.table_name,
            self.column_definition.trim()
        )
    }

    fn insert_sql(&self, literal: &str) -> String {
        format!("INSERT INTO {} VALUES ({literal})", self.table_name)
    }

    /// Drops, recreates and fills the table on a borrowed connection.
    ///
    /// A failed drop (typically because the table does not exist yet) is
    /// ignored. A failed create or insert aborts with `Provision`.
    pub async fn provision(&self, conn: &mut DbConnection) -> Result<()> {
        if let Err(e) = conn.execute(&self.drop_sql()).await {
            debug!(table = %self.table_name, "Ignoring drop failure: {e}");
        }

        conn.execute(&self.create_sql())
            .await
            .map_err(|e| {
                ResultsError::provision(format!(
                    "Failed to create table {}: {e}",
                    self.table_name
                ))
            })?;
        debug!(table = %self.table_name, "Created table");

        for (index, literal) in self.row_literals.iter().enumerate() {
            conn.execute(&self.insert_sql(literal))
                .await
                .map_err(|e| {
                    ResultsError::provision(format!(
                        "Failed to insert row {index} into {}: {e}",
                        self.table_name
                    ))
                })?;
        }
        debug!(
            table = %self.table_name,
            rows = self.row_literals.len(),
            "Inserted rows"
        );

        Ok(())
    }

    /// Provisions on an owned connection.
    ///
    /// With `close_after` the connection is closed whether or not
    /// provisioning succeeded and `Ok(None)` is returned; otherwise the
    /// connection is handed back. On failure without `close_after` the
    /// connection is dropped.
    pub async fn provision_owned(
        &self,
        mut conn: DbConnection,
        close_after: bool,
    ) -> Result<Option<DbConnection>> {
        let outcome = self.provision(&mut conn).await;

        if !close_after {
            return outcome.map(|()| Some(conn));
        }

        if let Err(e) = conn.close().await {
            warn!("Failed to close connection after provisioning: {e}");
        }
        outcome.map(|()| None)
    }
}
