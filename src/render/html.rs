//! HTML table rendering.

use super::ResultsRenderer;
use crate::db::QueryResults;
use crate::error::Result;

/// Renders results as an HTML `<table>` fragment.
///
/// Cell, heading and attribute text is HTML-escaped unless escaping is
/// switched off, in which case values are inserted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlTableRenderer {
    heading_color: Option<String>,
    escape: bool,
}

impl Default for HtmlTableRenderer {
    fn default() -> Self {
        Self {
            heading_color: None,
            escape: true,
        }
    }
}

impl HtmlTableRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the heading row background. `None` or an empty string omits it.
    pub fn with_heading_color(mut self, color: Option<String>) -> Self {
        self.heading_color = color.filter(|c| !c.is_empty());
        self
    }

    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape = escape;
        self
    }

    fn text<'a>(&self, value: &'a str) -> std::borrow::Cow<'a, str> {
        if self.escape {
            escape_html(value)
        } else {
            value.into()
        }
    }
}

impl ResultsRenderer for HtmlTableRenderer {
    fn render(&self, results: &QueryResults) -> Result<String> {
        let mut html = String::from("<table border=1>\n");

        match &self.heading_color {
            Some(color) => {
                html.push_str("\t<tr bgcolor=\"");
                html.push_str(&self.text(color));
                html.push_str("\">\n");
            }
            None => html.push_str("\t<tr>\n"),
        }
        html.push_str("\t\t");
        for name in results.column_names() {
            html.push_str("<th>");
            html.push_str(&self.text(name));
            html.push_str("</th>");
        }
        html.push_str("\n\t</tr>\n");

        for row in results.rows() {
            html.push_str("\t<tr>\n\t\t");
            for cell in row {
                html.push_str("<td>");
                if let Some(value) = cell {
                    html.push_str(&self.text(value));
                }
                html.push_str("</td>");
            }
            html.push_str("\n\t</tr>\n");
        }

        html.push_str("</table>");
        Ok(html)
    }
}

fn escape_html(value: &str) -> std::borrow::Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"']) {
        return value.into();
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped.into()
}
