//! Renderers for buffered query results.
//!
//! Every renderer only reads a [`QueryResults`], so the same result can be
//! rendered any number of times, in any format, with identical output.

mod html;
mod json;
mod text;

pub use html::HtmlTableRenderer;
pub use json::JsonRenderer;
pub use text::{TextTableRenderer, NULL_PLACEHOLDER};

use crate::db::QueryResults;
use crate::error::Result;
use std::io::Write;

/// Turns a result into a textual representation.
pub trait ResultsRenderer {
    /// Renders the whole result into a string.
    fn render(&self, results: &QueryResults) -> Result<String>;

    /// Streams the rendered result into `out`.
    fn write_to(&self, results: &QueryResults, out: &mut dyn Write) -> Result<()> {
        out.write_all(self.render(results)?.as_bytes())?;
        Ok(())
    }
}
