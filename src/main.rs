//! # DP Headline Monitor
//!
//! A scheduled, single-shot scraper that records one Daily Pennsylvanian
//! headline per calendar day in a durable JSON time series.
//!
//! ## Features
//!
//! - Scrapes a headline from [thedp.com](https://www.thedp.com) via one of
//!   two strategies: the "Most Read" article's title or the "Featured"
//!   section's first link
//! - Records it under today's local date in
//!   `data/daily_pennsylvanian_headlines.json`; reruns on the same day
//!   overwrite rather than duplicate
//! - Writes through a temp file + atomic rename, so the record is never
//!   observed half-written
//! - Logs every step to the console and a daily-rotated log file
//!
//! ## Usage
//!
//! ```sh
//! dp_headline_monitor --variant most-read
//! ```
//!
//! ## Architecture
//!
//! Each invocation is one linear run:
//! 1. **Setup**: ensure the data directory exists (fatal if not creatable)
//! 2. **Load**: read the full headline record into memory
//! 3. **Scrape**: fetch the homepage and extract a headline
//! 4. **Record**: on success, upsert today's entry and persist atomically
//! 5. **Diagnostics**: dump the working tree and the data file to the log

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod errors;
mod fetch;
mod monitor;
mod scrapers;
mod utils;

use cli::Cli;
use errors::ScrapeError;
use monitor::DailyEventMonitor;

/// File name of the headline record inside the data directory.
const DATA_FILE_NAME: &str = "daily_pennsylvanian_headlines.json";
/// File name prefix of the rotated run log inside the log directory.
const LOG_FILE_NAME: &str = "scrape.log";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    // --- Tracing init: console plus a daily-rotated log file ---
    let file_appender = tracing_appender::rolling::daily(&args.log_dir, LOG_FILE_NAME);
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tfmt::layer()
                .with_target(true)
                .with_timer(tfmt::time::UtcTime::rfc_3339()),
        )
        .with(
            tfmt::layer()
                .with_ansi(false)
                .with_timer(tfmt::time::UtcTime::rfc_3339())
                .with_writer(file_writer),
        )
        .init();

    let start_time = std::time::Instant::now();
    info!("headline_monitor starting up");
    debug!(?args.variant, ?args.data_dir, ?args.homepage_url, "Parsed CLI arguments");

    // Nothing can be recorded without the data directory; this is the one
    // unrecoverable setup failure.
    info!(path = %args.data_dir, "Creating data directory if it does not exist");
    if let Err(e) = utils::ensure_writable_dir(&args.data_dir).await {
        error!(path = %args.data_dir, error = %e, "Failed to create data directory");
        return Err(e);
    }

    let data_path = Path::new(&args.data_dir).join(DATA_FILE_NAME);
    info!(path = %data_path.display(), "Loading daily event monitor");
    let mut monitor = DailyEventMonitor::load(&data_path);
    info!(entries = monitor.len(), "Loaded daily event monitor");

    info!(variant = ?args.variant, url = %args.homepage_url, "Starting scrape");
    let headline = match scrapers::scrape_headline(&args.homepage_url, args.variant).await {
        Ok(headline) => Some(headline),
        Err(e @ ScrapeError::Transport(_)) => {
            error!(error = %e, "Scrape failed while fetching; nothing recorded this run");
            None
        }
        Err(e @ ScrapeError::Structure(_)) => {
            warn!(error = %e, "Scrape found no headline; nothing recorded this run");
            None
        }
    };

    if let Some(headline) = headline {
        monitor.add_today(&headline);
        match monitor.save() {
            Ok(()) => info!("Saved daily event monitor"),
            Err(e) => {
                error!(
                    path = %data_path.display(),
                    error = %e,
                    "Failed to save daily event monitor; today's headline was not persisted"
                );
            }
        }
    }

    // Operator-facing diagnostics
    if monitor.is_empty() {
        warn!("Monitor holds no entries; check the scrape log above");
    }
    for (date, recorded) in monitor.entries() {
        debug!(%date, %recorded, "Monitor entry");
    }
    utils::log_tree(Path::new("."));
    utils::log_file_contents(monitor.file_path());

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Scrape complete"
    );

    Ok(())
}
