//! Extraction of article summaries from the paginated blog listing.
//!
//! The scrape targets the *last* paginated page (the oldest posts), falling
//! back to the root listing page when no pagination control exists. Missing
//! per-card fields are replaced by documented defaults so the pipeline
//! always yields exactly as many summaries as cards found, never fewer.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

use blogsmith_shared::{ArticleSummary, DEFAULT_LINK, DEFAULT_TITLE};

/// Resolve the last pagination link on the listing page, if any.
///
/// Returns `None` when no `.pagination a` element exists or its href does
/// not resolve; the caller then scrapes the root listing page itself.
pub fn last_page_url(doc: &Html, base: &Url) -> Option<Url> {
    let selector = Selector::parse(".pagination a").expect("valid selector");

    let last = doc.select(&selector).last()?;
    let href = last.value().attr("href")?;

    match base.join(href) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(href, error = %e, "pagination href did not resolve, using root page");
            None
        }
    }
}

/// Extract up to `limit` article summaries from listing cards in document order.
pub fn extract_summaries(doc: &Html, base: &Url, limit: usize) -> Vec<ArticleSummary> {
    let card_selector = Selector::parse(".blog-card").expect("valid selector");

    doc.select(&card_selector)
        .take(limit)
        .map(|card| extract_summary(card, base))
        .collect()
}

/// Extract one summary from a listing card, substituting defaults for
/// missing fields.
fn extract_summary(card: ElementRef<'_>, base: &Url) -> ArticleSummary {
    let title_selector = Selector::parse("h2").expect("valid selector");
    let link_selector = Selector::parse("a").expect("valid selector");

    let title = card
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| {
            warn!("listing card has no heading, substituting default title");
            DEFAULT_TITLE.to_string()
        });

    let href = card
        .select(&link_selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .unwrap_or_else(|| {
            warn!(title, "listing card has no link, substituting placeholder");
            DEFAULT_LINK
        });

    // A placeholder or malformed href still yields a summary; the detail
    // fetch for it fails in isolation later rather than dropping the card.
    let detail_url = base.join(href).unwrap_or_else(|e| {
        warn!(href, error = %e, "card link did not resolve, keeping placeholder");
        base.join(DEFAULT_LINK).expect("placeholder resolves")
    });

    ArticleSummary { title, detail_url }
}
