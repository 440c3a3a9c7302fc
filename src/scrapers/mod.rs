//! Headline extraction strategies for the Daily Pennsylvanian homepage.
//!
//! Two interchangeable variants exist, selected per run:
//!
//! | Variant | Requests | Headline source |
//! |---------|----------|-----------------|
//! | [`most_read`] | 2 | `<h1>` of the first article in the "Most Read" sidebar |
//! | [`featured`] | 1 | Text of the first link after the "Featured" section heading |
//!
//! # Common Patterns
//!
//! Each variant module exports a `scrape_headline` function returning
//! `Result<String, ScrapeError>`. Extraction is a pipeline of locate steps
//! that short-circuits at the first absent element with a
//! [`ScrapeError::Structure`](crate::errors::ScrapeError) naming that
//! element. Parsing is pure over already-fetched content, so every locate
//! step is testable offline against HTML fixtures.

pub mod featured;
pub mod most_read;

use crate::errors::ScrapeError;
use crate::fetch::build_client;
use clap::ValueEnum;
use tracing::instrument;

/// Which part of the homepage supplies the day's headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// First article in the "Most Read" sidebar; headline taken from the
    /// article page itself.
    MostRead,
    /// First article link following the "Featured" section heading.
    Featured,
}

/// Run the selected extraction strategy against the homepage.
#[instrument(level = "info", skip(homepage_url))]
pub async fn scrape_headline(homepage_url: &str, variant: Variant) -> Result<String, ScrapeError> {
    let client = build_client()?;
    match variant {
        Variant::MostRead => most_read::scrape_headline(&client, homepage_url).await,
        Variant::Featured => featured::scrape_headline(&client, homepage_url).await,
    }
}
