//! PostgreSQL integration tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable to run them.

use db_results::config::ConnectionConfig;
use db_results::db::{self, DbConnection, TableProvisioner};
use db_results::error::ResultsError;
use db_results::query::QueryExecutor;

/// Helper to get test database URL from environment.
fn get_test_database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

/// Helper to open a test connection.
async fn get_test_connection() -> Option<DbConnection> {
    let url = get_test_database_url()?;
    let config = ConnectionConfig::from_connection_string(&url).ok()?;
    db::connect(&config).await.ok()
}

#[tokio::test]
async fn test_postgres_metadata_and_rows() {
    let Some(mut conn) = get_test_connection().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    TableProvisioner::new(
        "db_results_fixture",
        "(id INTEGER PRIMARY KEY, name VARCHAR(20), note TEXT)",
    )
    .unwrap()
    .row("1, 'Alice', NULL")
    .row("2, 'Bob', 'hello'")
    .provision(&mut conn)
    .await
    .unwrap();

    let results = QueryExecutor::new()
        .run_with_connection(
            conn,
            "SELECT id, name, note FROM db_results_fixture ORDER BY id",
            true,
        )
        .await
        .unwrap();

    assert_eq!(results.product_name(), "PostgreSQL");
    assert!(!results.product_version().is_empty());
    assert_eq!(results.column_names(), ["id", "name", "note"]);
    assert_eq!(
        results.row(0).unwrap(),
        [Some("1".to_string()), Some("Alice".to_string()), None]
    );
    assert_eq!(results.row(1).unwrap()[2].as_deref(), Some("hello"));
}

#[tokio::test]
async fn test_postgres_query_error() {
    let Some(mut conn) = get_test_connection().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let err = QueryExecutor::new()
        .fetch(&mut conn, "SELECT * FROM db_results_missing_table")
        .await
        .unwrap_err();
    assert!(matches!(err, ResultsError::Query(_)));
}
