//! JSON rendering.

use super::ResultsRenderer;
use crate::db::QueryResults;
use crate::error::{ResultsError, Result};

/// Renders results as a JSON document with metadata, column names and rows.
/// NULL cells become JSON `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonRenderer {
    compact: bool,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits the document on a single line.
    pub fn compact(mut self) -> Self {
        self.compact = true;
        self
    }
}

impl ResultsRenderer for JsonRenderer {
    fn render(&self, results: &QueryResults) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(results)
        } else {
            serde_json::to_string_pretty(results)
        };
        json.map_err(|e| ResultsError::invalid_argument(format!("Cannot encode results: {e}")))
    }
}
