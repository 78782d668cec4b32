//! CLI entry point for the train arrival board.
//!
//! Provides subcommands for rendering the board once, refreshing it on a
//! schedule, and dumping a decoded feed.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use train_board::{
    board::{Board, BoardState, render_board},
    clock::{Clock, SystemClock},
    config::BoardConfig,
    fetch::{ApiKey, BasicClient, DEFAULT_HEADER, RetryPolicy, fetch_with_retry},
    output::{append_record, print_lines, print_pretty, to_json, with_rgb},
    parser::parse_feed,
};

#[derive(Parser)]
#[command(name = "train_board")]
#[command(about = "Next-train board for a GTFS-realtime subway feed", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the board once from a file or URL
    Show {
        /// Path to file or URL to fetch (defaults to the configured feed)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Print the snapshot as JSON, with per-character RGB from the palette
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Refresh the board periodically
    Watch {
        /// CSV file to append every refreshed snapshot to
        #[arg(short, long)]
        record: Option<String>,

        /// Number of refreshes to run (0 = until Ctrl+C)
        #[arg(short = 'n', long, default_value_t = 0)]
        iterations: usize,
    },
    /// Decode a feed and print it as JSON
    Dump {
        /// Path to file or URL to fetch (defaults to the configured feed)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/train_board.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("train_board.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = BoardConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Show { source, json } => {
            let source = source.unwrap_or_else(|| config.feed_url.clone());
            let bytes = fetcher(&source, &config).await?;
            let snapshot = render_board(&bytes, &config.directions, SystemClock.now())
                .context("feed could not be decoded")?;

            print_pretty(&snapshot);
            if json {
                println!("{}", to_json(&with_rgb(&snapshot, &config.palette))?);
            } else {
                for line in &snapshot.lines {
                    println!("{}", line.line.text);
                }
            }
        }
        Commands::Watch { record, iterations } => {
            tokio::select! {
                result = watch(&config, record.as_deref(), iterations, &SystemClock) => result?,
                _ = tokio::signal::ctrl_c() => info!("Interrupted, stopping"),
            }
        }
        Commands::Dump { source } => {
            let source = source.unwrap_or_else(|| config.feed_url.clone());
            let bytes = fetcher(&source, &config).await?;
            let feed = parse_feed(&bytes).context("feed could not be decoded")?;
            info!(entity_count = feed.entity.len(), "Feed decoded");
            println!("{}", to_json(&feed)?);
        }
    }

    Ok(())
}

/// Loads feed data from a local file path or fetches it over HTTP.
#[tracing::instrument(skip(source, config), fields(source = %source))]
async fn fetcher(source: &str, config: &BoardConfig) -> Result<Vec<u8>> {
    if !source.starts_with("http") {
        return std::fs::read(source).with_context(|| format!("failed to read '{source}'"));
    }

    let client = BasicClient::new(config.request_timeout())?;
    let policy = RetryPolicy {
        max_attempts: config.max_retries,
        delay: std::time::Duration::from_secs(config.retry_delay_secs),
    };

    match &config.api_key {
        Some(key) => {
            let client = ApiKey::new(client, DEFAULT_HEADER, key)?;
            fetch_with_retry(&client, source, &policy).await
        }
        None => fetch_with_retry(&client, source, &policy).await,
    }
}

/// Refreshes the board every `refresh_interval_secs`, skipping the fetch
/// during quiet hours. A failed cycle leaves the previous board up.
#[tracing::instrument(skip(config, clock), fields(refresh_secs = config.refresh_interval_secs))]
async fn watch(
    config: &BoardConfig,
    record: Option<&str>,
    iterations: usize,
    clock: &dyn Clock,
) -> Result<()> {
    let mut board = Board::new();
    let mut ticker = tokio::time::interval(config.refresh_interval());
    let mut cycle = 0;

    loop {
        if iterations > 0 && cycle >= iterations {
            break;
        }
        ticker.tick().await;
        cycle += 1;

        if config.is_quiet(clock) {
            info!(cycle, "Quiet hours, board dark");
            continue;
        }

        let outcome = match fetcher(&config.feed_url, config).await {
            Ok(bytes) => render_board(&bytes, &config.directions, clock.now())
                .context("feed could not be decoded"),
            Err(e) => Err(e),
        };
        let refreshed = outcome.is_ok();
        board.refresh(outcome.map_err(|e| format!("{e:#}")));

        match board.state() {
            BoardState::Showing(snapshot) => {
                print_lines(snapshot);
                if let (true, Some(path)) = (refreshed, record) {
                    if let Err(e) = append_record(path, snapshot) {
                        error!(path, error = %e, "Failed to record snapshot");
                    }
                }
            }
            BoardState::Failed(_) => {
                for line in board.lines() {
                    warn!(failures = board.consecutive_failures(), "{}", line.text);
                }
            }
            BoardState::Empty => {}
        }
    }

    info!(cycles = cycle, "Finished refreshing");
    Ok(())
}
