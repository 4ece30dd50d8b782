//! Query execution integration tests.
//!
//! Runs queries through the public executor API against SQLite.

use super::{file_config, memory_config};
use db_results::config::ConnectionConfig;
use db_results::db::{self, TableModel, TableProvisioner, Vendor};
use db_results::error::ResultsError;
use db_results::query::QueryExecutor;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_run_and_close() {
    let results = QueryExecutor::new()
        .run(&memory_config(), "SELECT 1 AS id, 'Alice' AS name", true)
        .await
        .unwrap();

    assert_eq!(results.product_name(), "SQLite");
    assert_eq!(results.column_names(), ["id", "name"]);
    assert_eq!(results.row_count(), 1);
    assert_eq!(
        results.row(0).unwrap(),
        [Some("1".to_string()), Some("Alice".to_string())]
    );
    assert!(!results.has_connection());
}

#[tokio::test]
async fn test_zero_rows_keeps_column_names() {
    let results = QueryExecutor::new()
        .run(&memory_config(), "SELECT 1 AS x, 2 AS y WHERE 1 = 0", true)
        .await
        .unwrap();

    assert_eq!(results.column_names(), ["x", "y"]);
    assert_eq!(results.row_count(), 0);
    assert!(results.is_empty());
    assert!(matches!(
        results.row(0).unwrap_err(),
        ResultsError::OutOfRange(_)
    ));
}

#[tokio::test]
async fn test_null_cell_is_absent() {
    let results = QueryExecutor::new()
        .run(&memory_config(), "SELECT NULL AS a, 2 AS b", true)
        .await
        .unwrap();

    assert_eq!(results.row(0).unwrap(), [None, Some("2".to_string())]);
    assert_eq!(results.cell_value(0, 0).unwrap(), None);
    assert_eq!(results.cell_value(0, 1).unwrap(), Some("2"));
}

#[tokio::test]
async fn test_keep_connection_open() {
    let results = QueryExecutor::new()
        .run(&memory_config(), "SELECT 1 AS one", false)
        .await
        .unwrap();
    assert!(results.has_connection());

    let mut conn = results.take_connection().unwrap();
    assert!(!results.has_connection());
    assert!(results.take_connection().is_none());

    // Still usable by the caller.
    let again = QueryExecutor::new()
        .fetch(&mut conn, "SELECT 2 AS two")
        .await
        .unwrap();
    assert_eq!(again.row(0).unwrap(), [Some("2".to_string())]);
}

#[tokio::test]
async fn test_close_connection_is_idempotent() {
    let results = QueryExecutor::new()
        .run(&memory_config(), "SELECT 1 AS one", false)
        .await
        .unwrap();

    results.close_connection().await.unwrap();
    assert!(!results.has_connection());
    results.close_connection().await.unwrap();

    // Data outlives the connection.
    assert_eq!(results.row(0).unwrap(), [Some("1".to_string())]);
}

#[tokio::test]
async fn test_run_failure_is_query_error() {
    let err = QueryExecutor::new()
        .run(&memory_config(), "SELEC nonsense", true)
        .await
        .unwrap_err();

    assert!(matches!(err, ResultsError::Query(_)));
    assert_eq!(err.category(), "Query Error");
}

#[tokio::test]
async fn test_unsupported_vendor_fails_before_connecting() {
    let config = ConnectionConfig {
        vendor: Vendor::Oracle,
        host: Some("db.internal".to_string()),
        database: Some("orcl".to_string()),
        ..Default::default()
    };

    let err = QueryExecutor::new()
        .run(&config, "SELECT 1 FROM dual", true)
        .await
        .unwrap_err();
    assert!(matches!(err, ResultsError::UnsupportedVendor(_)));
}

#[tokio::test]
async fn test_rows_keep_result_order() {
    let mut conn = db::connect(&memory_config()).await.unwrap();
    TableProvisioner::new("numbers", "(n INTEGER, label TEXT)")
        .unwrap()
        .rows(["3, 'three'", "1, 'one'", "2, 'two'"])
        .provision(&mut conn)
        .await
        .unwrap();

    let results = QueryExecutor::new()
        .run_with_connection(conn, "SELECT n, label FROM numbers ORDER BY n DESC", true)
        .await
        .unwrap();

    let labels: Vec<_> = (0..results.row_count())
        .map(|i| results.cell_value(i, 1).unwrap().unwrap().to_string())
        .collect();
    assert_eq!(labels, ["three", "two", "one"]);
}

#[tokio::test]
async fn test_file_database_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir.path().join("fixtures.db"));

    let conn = db::connect(&config).await.unwrap();
    TableProvisioner::new("people", "(id INTEGER, name VARCHAR(20))")
        .unwrap()
        .row("1, 'Alice'")
        .row("2, 'Bob'")
        .provision_owned(conn, true)
        .await
        .unwrap();

    let mut conn = db::connect(&config).await.unwrap();
    let results = QueryExecutor::new()
        .fetch_table(&mut conn, "people")
        .await
        .unwrap();

    assert_eq!(results.column_names(), ["id", "name"]);
    assert_eq!(results.row_count(), 2);
    assert_eq!(
        results.row(1).unwrap(),
        [Some("2".to_string()), Some("Bob".to_string())]
    );
}

#[tokio::test]
async fn test_missing_table() {
    let mut conn = db::connect(&memory_config()).await.unwrap();
    let err = QueryExecutor::new()
        .fetch_table(&mut conn, "employees")
        .await
        .unwrap_err();

    assert!(matches!(err, ResultsError::Query(_)));
    assert!(err.to_string().contains("employees"));
}
