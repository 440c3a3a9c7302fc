//! Command-line interface definitions for the headline monitor.
//!
//! All options have defaults suited to the once-daily cron invocation, and
//! can be overridden via flags or environment variables.

use crate::scrapers::Variant;
use clap::Parser;

/// Command-line arguments for the headline monitor.
///
/// # Examples
///
/// ```sh
/// # Record today's most-read headline (the default)
/// dp_headline_monitor
///
/// # Record the featured section's headline instead
/// dp_headline_monitor --variant featured
///
/// # Point at a staging copy of the site
/// dp_headline_monitor --homepage-url http://localhost:8080
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the headline time series
    #[arg(short, long, default_value = "data")]
    pub data_dir: String,

    /// Directory for the daily-rotated run log
    #[arg(short, long, default_value = "logs")]
    pub log_dir: String,

    /// Which homepage section supplies the headline
    #[arg(long, value_enum, env = "HEADLINE_VARIANT", default_value_t = Variant::MostRead)]
    pub variant: Variant,

    /// Homepage to scrape
    #[arg(long, env = "HOMEPAGE_URL", default_value = "https://www.thedp.com")]
    pub homepage_url: String,
}
