use std::io;
use std::process::ExitCode;

use clap::Parser;
use pagedb::{Config, Repl, Table, TABLE_MAX_PAGES};
use tracing_subscriber::{EnvFilter, fmt};

/// Interactive front end over an in-memory paged row store
#[derive(Parser, Debug)]
#[command(name = "pagedb")]
#[command(version)]
struct Args {
    /// Maximum number of 4 KiB pages the table may allocate
    #[arg(short, long, default_value_t = TABLE_MAX_PAGES)]
    max_pages: usize,
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only the REPL transcript.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::builder().max_pages(args.max_pages).build();

    let table = match Table::new(&config) {
        Ok(table) => table,
        Err(e) => {
            tracing::error!("Failed to create table: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        version = pagedb::VERSION,
        max_pages = table.max_pages(),
        max_rows = table.max_rows(),
        "starting"
    );

    let mut repl = Repl::new(table);
    if let Err(e) = repl.run(io::stdin().lock(), io::stdout().lock()) {
        tracing::error!("{}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
