//! Fixed-width text tables.
//!
//! Layout, for a title `people` and an entry width of 5:
//!
//! ```text
//! people:
//! =======
//! +------+------+
//! |   ID | NAME |
//! +------+------+
//! |    1 |Alice |
//! +------+------+
//! ```
//!
//! Every cell is right-aligned by prepending spaces up to the entry width.
//! Content longer than the entry width is never truncated; the column then
//! simply comes out wider, so callers should pick a width at least as large
//! as the longest cell.

use super::ResultsRenderer;
use crate::db::QueryResults;
use crate::error::Result;
use std::io::Write;

/// Shown in place of SQL NULL.
pub const NULL_PLACEHOLDER: &str = "<null>";

/// Renders results as a bordered, fixed-width text table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTableRenderer {
    title: String,
    entry_width: usize,
    include_metadata: bool,
}

impl TextTableRenderer {
    pub fn new(title: impl Into<String>, entry_width: usize) -> Self {
        Self {
            title: title.into(),
            entry_width,
            include_metadata: false,
        }
    }

    /// Prints the database product name and version above the table.
    pub fn with_metadata(mut self, include_metadata: bool) -> Self {
        self.include_metadata = include_metadata;
        self
    }

    /// Returns the rendered table, one entry per output line.
    pub fn lines(&self, results: &QueryResults) -> Vec<String> {
        let mut lines = Vec::with_capacity(results.row_count() + 8);

        if self.include_metadata {
            lines.push(format!("Database: {}", results.product_name()));
            lines.push(format!("Version: {}", results.product_version()));
        }

        lines.push(format!("{}:", self.title));
        lines.push("=".repeat(self.title.chars().count() + 1));

        let separator = separator(self.entry_width, results.column_count());
        lines.push(separator.clone());
        lines.push(table_row(
            results.column_names().iter().map(String::as_str),
            self.entry_width,
        ));
        lines.push(separator.clone());

        for row in results.rows() {
            lines.push(table_row(
                row.iter()
                    .map(|cell| cell.as_deref().unwrap_or(NULL_PLACEHOLDER)),
                self.entry_width,
            ));
        }

        lines.push(separator);
        lines
    }

    /// Streams the table line by line into `out`.
    pub fn write_lines<W: Write + ?Sized>(
        &self,
        results: &QueryResults,
        out: &mut W,
    ) -> Result<()> {
        for line in self.lines(results) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

impl ResultsRenderer for TextTableRenderer {
    fn render(&self, results: &QueryResults) -> Result<String> {
        let mut text = self.lines(results).join("\n");
        text.push('\n');
        Ok(text)
    }

    fn write_to(&self, results: &QueryResults, out: &mut dyn Write) -> Result<()> {
        self.write_lines(results, out)
    }
}

/// Prepends `fill` until `content` is `width` characters long.
fn pad(content: &str, width: usize, fill: char) -> String {
    let len = content.chars().count();
    let mut padded = String::with_capacity(width.max(len));
    padded.extend(std::iter::repeat(fill).take(width.saturating_sub(len)));
    padded.push_str(content);
    padded
}

/// `+` followed by one `-` run of `entry_width + 1` and a `+` per column.
fn separator(entry_width: usize, column_count: usize) -> String {
    let entry = pad("", entry_width + 1, '-');
    let mut line = String::from("+");
    for _ in 0..column_count {
        line.push_str(&entry);
        line.push('+');
    }
    line
}

fn table_row<'a>(cells: impl Iterator<Item = &'a str>, entry_width: usize) -> String {
    let mut line = String::from("|");
    for cell in cells {
        line.push_str(&pad(cell, entry_width, ' '));
        line.push_str(" |");
    }
    line
}
