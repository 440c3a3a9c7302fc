//! "Most Read" extraction strategy.
//!
//! Two requests: the homepage locates the most-read article's URL, the
//! article page supplies its headline.
//!
//! # Markup
//!
//! The homepage marks the section with `<span id="mostRead">`; articles
//! inside it are linked as `<a class="frontpage-link standard-link">` with
//! site-relative hrefs. The article page carries its headline in the first
//! `<h1>`.

use crate::errors::ScrapeError;
use crate::fetch::fetch_page;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, instrument};
use url::Url;

static MOST_READ_SECTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span#mostRead").unwrap());
static ARTICLE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.frontpage-link.standard-link[href]").unwrap());
static PRIMARY_HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());

/// Scrape the headline of the most-read article.
#[instrument(level = "info", skip_all)]
pub async fn scrape_headline(client: &Client, homepage_url: &str) -> Result<String, ScrapeError> {
    let homepage = fetch_page(client, homepage_url).await?;
    let article_url = find_most_read_article_url(&homepage, homepage_url)?;
    info!(%article_url, "Most Read article URL");

    let article = fetch_page(client, &article_url).await?;
    let headline = extract_primary_heading(&article)?;
    info!(%headline, "Extracted headline");
    Ok(headline)
}

/// Locate the first linked article in the "Most Read" section and resolve
/// its href against the homepage URL.
fn find_most_read_article_url(html: &str, homepage_url: &str) -> Result<String, ScrapeError> {
    let document = Html::parse_document(html);
    let section = document
        .select(&MOST_READ_SECTION)
        .next()
        .ok_or(ScrapeError::Structure("no 'Most Read' section on homepage"))?;
    let link = section
        .select(&ARTICLE_LINK)
        .next()
        .ok_or(ScrapeError::Structure(
            "no article link in 'Most Read' section",
        ))?;
    // The selector requires href, so the attribute is present.
    let href = link.value().attr("href").unwrap_or_default();

    let base = Url::parse(homepage_url)
        .map_err(|_| ScrapeError::Structure("homepage URL is not a valid base URL"))?;
    let resolved = base
        .join(href)
        .map_err(|_| ScrapeError::Structure("article href does not resolve to a URL"))?;
    Ok(resolved.to_string())
}

/// Text of the article page's first `<h1>`, whitespace-normalized.
fn extract_primary_heading(html: &str) -> Result<String, ScrapeError> {
    let document = Html::parse_document(html);
    let heading = document
        .select(&PRIMARY_HEADING)
        .next()
        .ok_or(ScrapeError::Structure("article page has no <h1> heading"))?;

    let text = heading.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return Err(ScrapeError::Structure("article <h1> heading is empty"));
    }
    Ok(text)
}
