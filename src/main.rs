//! dbresults - Run a SQL query and print the buffered result as a table.

use db_results::cli::{Cli, Command, OutputFormat, RenderArgs};
use db_results::config::{Config, ConnectionConfig, RenderConfig};
use db_results::db::{self, DbConnection, QueryResults, TableProvisioner};
use db_results::error::{ResultsError, Result};
use db_results::logging;
use db_results::query::QueryExecutor;
use db_results::render::{HtmlTableRenderer, JsonRenderer, ResultsRenderer, TextTableRenderer};
use std::io::Write;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse_args();

    match &cli.log_file {
        Some(path) => logging::init_file_logging(path),
        None => logging::init_stderr_logging(),
    }

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    debug!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    // Precedence:
    // 1. CLI arguments (highest), layered over a named connection
    // 2. Named connection from config
    // 3. Default connection from config
    // 4. Environment variables
    let connection = resolve_connection(&cli, &config)?.ok_or_else(|| {
        ResultsError::config("No database connection configured. Use --help for usage information.")
    })?;
    info!("Connection: {}", connection.display_string());

    let mut executor = QueryExecutor::new();
    if let Some(timeout) = cli
        .timeout
        .map(Duration::from_secs)
        .or_else(|| config.query.statement_timeout())
    {
        executor = executor.with_statement_timeout(timeout);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Query {
            sql,
            format,
            title,
            render,
        } => {
            let results = executor.run(&connection, sql, true).await?;
            let renderer = build_renderer(*format, title, render, &config.render);
            renderer.write_to(&results, &mut out)?;
            if *format != OutputFormat::Text {
                writeln!(out)?;
            }
        }
        Command::Table { name, render } => {
            let mut conn = db::connect(&connection).await?;
            let outcome = executor.fetch_table(&mut conn, name).await;
            close_quietly(conn).await;

            let results = outcome?;
            print_text(&results, name, render, &config.render, &mut out)?;
        }
        Command::Provision {
            table,
            columns,
            rows,
            render,
        } => {
            let provisioner = TableProvisioner::new(table.as_str(), columns.as_str())?
                .rows(rows.iter().cloned());

            let mut conn = db::connect(&connection).await?;
            let outcome = async {
                provisioner.provision(&mut conn).await?;
                info!(table = %table, rows = rows.len(), "Provisioned table");
                executor.fetch_table(&mut conn, table).await
            }
            .await;
            close_quietly(conn).await;

            let results = outcome?;
            print_text(&results, table, render, &config.render, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Resolves the final connection configuration from CLI args, config file, and environment.
fn resolve_connection(cli: &Cli, config: &Config) -> Result<Option<ConnectionConfig>> {
    let mut connection = cli.resolve_connection(config)?;
    if let Some(conn) = connection.as_mut() {
        conn.apply_env_defaults();
    }
    Ok(connection)
}

fn text_renderer(title: &str, args: &RenderArgs, defaults: &RenderConfig) -> TextTableRenderer {
    TextTableRenderer::new(title, args.width.unwrap_or(defaults.entry_width))
        .with_metadata(args.metadata || defaults.include_metadata)
}

fn build_renderer(
    format: OutputFormat,
    title: &str,
    args: &RenderArgs,
    defaults: &RenderConfig,
) -> Box<dyn ResultsRenderer> {
    match format {
        OutputFormat::Text => Box::new(text_renderer(title, args, defaults)),
        OutputFormat::Html => Box::new(HtmlTableRenderer::new().with_heading_color(
            args.heading_color
                .clone()
                .or_else(|| defaults.heading_color.clone()),
        )),
        OutputFormat::Json => Box::new(JsonRenderer::new()),
    }
}

fn print_text(
    results: &QueryResults,
    title: &str,
    args: &RenderArgs,
    defaults: &RenderConfig,
    out: &mut dyn Write,
) -> Result<()> {
    text_renderer(title, args, defaults).write_lines(results, out)
}

async fn close_quietly(conn: DbConnection) {
    if let Err(e) = conn.close().await {
        warn!("Failed to close connection: {e}");
    }
}
