//! "Featured" extraction strategy.
//!
//! One request: the homepage carries a section heading containing the word
//! "Featured"; the headline is the text of the first article link that
//! follows the heading in document order. Descendants of the heading itself
//! count as "following", matching a document-order search from the heading.

use crate::errors::ScrapeError;
use crate::fetch::fetch_page;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{info, instrument};

static SECTION_HEADINGS: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3, h4").unwrap());

/// Scrape the headline of the featured article.
#[instrument(level = "info", skip_all)]
pub async fn scrape_headline(client: &Client, homepage_url: &str) -> Result<String, ScrapeError> {
    let homepage = fetch_page(client, homepage_url).await?;
    let headline = find_featured_link_text(&homepage)?;
    info!(%headline, "Extracted headline");
    Ok(headline)
}

/// Locate the "Featured" section heading, then the first link after it in
/// document order with non-empty text.
fn find_featured_link_text(html: &str) -> Result<String, ScrapeError> {
    let document = Html::parse_document(html);
    let heading = document
        .select(&SECTION_HEADINGS)
        .find(|h| h.text().any(|t| t.contains("Featured")))
        .ok_or(ScrapeError::Structure(
            "no 'Featured' section heading on homepage",
        ))?;

    let heading_id = heading.id();
    let mut past_heading = false;
    for node in document.root_element().descendants() {
        if node.id() == heading_id {
            past_heading = true;
            continue;
        }
        if !past_heading {
            continue;
        }
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        if element.value().name() != "a" || element.value().attr("href").is_none() {
            continue;
        }
        let text = element.text().collect::<Vec<_>>().join(" ");
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        // Image-only links have no text; keep scanning.
        if !text.is_empty() {
            return Ok(text);
        }
    }

    Err(ScrapeError::Structure(
        "no article link after 'Featured' heading",
    ))
}
