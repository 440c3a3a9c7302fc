//! Error types for the scrape pipeline and the persistence layer.
//!
//! The orchestrator pattern-matches on [`ScrapeError`] to decide severity:
//! transport failures are logged as errors, structural misses as warnings.
//! Both resolve to "nothing recorded this run". [`StoreError`] is the one
//! failure that must reach the caller, since a swallowed save failure is
//! silent data loss.

use thiserror::Error;

/// Failures while fetching or extracting a headline.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Anything the HTTP layer reports: DNS, connect, timeout, non-2xx status.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The page no longer matches the markup we scrape. Carries the name of
    /// the first missing element so the log says which step gave up.
    #[error("page structure changed: {0}")]
    Structure(&'static str),
}

/// Failures while persisting the daily event monitor.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
