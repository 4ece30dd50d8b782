//! End-to-end rendering of live query results.

use super::memory_config;
use db_results::db::{self, QueryResults, TableProvisioner};
use db_results::query::QueryExecutor;
use db_results::render::{HtmlTableRenderer, JsonRenderer, ResultsRenderer, TextTableRenderer};
use pretty_assertions::assert_eq;

async fn people() -> QueryResults {
    let mut conn = db::connect(&memory_config()).await.unwrap();
    TableProvisioner::new("people", "(ID INTEGER, NAME VARCHAR(10))")
        .unwrap()
        .row("1, 'Alice'")
        .row("2, 'Bob'")
        .row("3, NULL")
        .provision(&mut conn)
        .await
        .unwrap();

    QueryExecutor::new()
        .run_with_connection(conn, "SELECT ID, NAME FROM people ORDER BY ID", true)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_text_table_from_query() {
    let results = people().await;
    let text = TextTableRenderer::new("people", 5).render(&results).unwrap();

    let expected = "\
people:
=======
+------+------+
|   ID | NAME |
+------+------+
|    1 |Alice |
|    2 |  Bob |
|    3 |<null> |
+------+------+
";
    assert_eq!(text, expected);
}

#[tokio::test]
async fn test_text_table_with_metadata() {
    let results = people().await;
    let lines = TextTableRenderer::new("people", 6)
        .with_metadata(true)
        .lines(&results);

    assert_eq!(lines[0], "Database: SQLite");
    assert!(lines[1].starts_with("Version: 3."));
    assert_eq!(lines[2], "people:");
}

#[tokio::test]
async fn test_html_table_from_query() {
    let results = people().await;
    let html = HtmlTableRenderer::new()
        .with_heading_color(Some("#C0C0C0".to_string()))
        .render(&results)
        .unwrap();

    let expected = "<table border=1>
\t<tr bgcolor=\"#C0C0C0\">
\t\t<th>ID</th><th>NAME</th>
\t</tr>
\t<tr>
\t\t<td>1</td><td>Alice</td>
\t</tr>
\t<tr>
\t\t<td>2</td><td>Bob</td>
\t</tr>
\t<tr>
\t\t<td>3</td><td></td>
\t</tr>
</table>";
    assert_eq!(html, expected);
}

#[tokio::test]
async fn test_renderers_share_one_result() {
    let results = people().await;
    let text = TextTableRenderer::new("people", 8);
    let html = HtmlTableRenderer::new();

    let first_text = text.render(&results).unwrap();
    let first_html = html.render(&results).unwrap();
    let json = JsonRenderer::new().render(&results).unwrap();

    assert_eq!(text.render(&results).unwrap(), first_text);
    assert_eq!(html.render(&results).unwrap(), first_html);

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["column_names"][1], "NAME");
    assert_eq!(parsed["rows"][2][1], serde_json::Value::Null);
}

#[tokio::test]
async fn test_write_to_streams_same_text() {
    let results = people().await;
    let renderer = TextTableRenderer::new("people", 5);

    let mut out = Vec::new();
    renderer.write_to(&results, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        renderer.render(&results).unwrap()
    );
}
