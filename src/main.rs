// src/main.rs
mod aggregate;
mod extractors;
mod fetch;
mod storage;
mod utils;
mod web;

use clap::{Parser, Subcommand};
use extractors::TableExtractor;
use fetch::client::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use fetch::{FetchConfig, HttpFetcher};
use std::sync::Arc;
use std::time::Duration;
use storage::{FsTableStore, MemoryTableStore, TableStore};
use utils::AppError;

/// Extract HTML tables from web pages into downloadable CSV files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output directory for the CSV files
    #[arg(short, long, default_value = "./downloads", global = true)]
    output_dir: String,

    /// Seconds to wait for each page before giving up
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    user_agent: String,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the web form (the default when no subcommand is given)
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:5000")]
        bind: String,
    },
    /// Extract tables from the given URLs and print a JSON summary
    Extract {
        /// Page URLs, processed in order
        #[arg(required = true)]
        urls: Vec<String>,

        /// Keep the CSV files in memory instead of writing them
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (RUST_LOG wins over --verbose)
    utils::logging::setup_logging(args.verbose);
    tracing::info!("Starting with args: {:?}", args);

    if args.timeout_secs == 0 {
        return Err(AppError::Config("--timeout-secs must be at least 1".to_string()));
    }

    // 3. Build the HTTP fetcher
    let fetcher = Arc::new(HttpFetcher::new(FetchConfig {
        user_agent: args.user_agent.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
    })?);
    let extractor = Arc::new(TableExtractor::new());

    match args.command {
        Some(Command::Extract { urls, dry_run }) => {
            let block = urls.join("\n");
            let outcome = if dry_run {
                let store = MemoryTableStore::new();
                let outcome = aggregate::aggregate(fetcher.as_ref(), &store, &extractor, &block).await?;
                tracing::info!("Dry run, nothing written. Would have saved: {:?}", store.names());
                outcome
            } else {
                let store = FsTableStore::new(&args.output_dir)?;
                aggregate::aggregate(fetcher.as_ref(), &store, &extractor, &block).await?
            };

            for saved in &outcome.tables {
                tracing::info!(
                    "Table {} '{}': {} rows -> {}",
                    saved.table.index,
                    saved.table.title,
                    saved.table.rows().len(),
                    saved.file_name
                );
            }
            tracing::info!("Combined dataset: {} rows", outcome.combined.rows.len());
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        command => {
            let bind = match command {
                Some(Command::Serve { bind }) => bind,
                _ => "127.0.0.1:5000".to_string(),
            };
            serve(&bind, &args.output_dir, fetcher, extractor).await?;
        }
    }

    Ok(())
}

async fn serve(
    bind: &str,
    output_dir: &str,
    fetcher: Arc<HttpFetcher>,
    extractor: Arc<TableExtractor>,
) -> Result<(), AppError> {
    let store = FsTableStore::new(output_dir)?;
    tracing::info!("Writing CSV files to {}", store.base_dir().display());

    let store: Arc<dyn TableStore> = Arc::new(store);
    let app = web::router(web::AppState {
        fetcher,
        store,
        extractor,
    });

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
