//! Single-attempt HTTP retrieval with a fixed browser identity and timeout.
//!
//! thedp.com serves a near-empty shell to clients that look like bots, so
//! every request carries a desktop Chrome user-agent. One attempt per URL,
//! bounded by a 10 second budget; the scheduler will try again tomorrow.

use crate::errors::ScrapeError;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

/// User agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the HTTP client shared by a run.
pub fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
}

/// Fetch a page body. Non-2xx statuses count as transport failures.
#[instrument(level = "info", skip(client))]
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, ScrapeError> {
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.text().await?;
    debug!(bytes = body.len(), "Fetched page");
    Ok(body)
}
