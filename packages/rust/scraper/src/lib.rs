//! HTML fetching and extraction for the blog listing scrape.
//!
//! Fetching is the only async part; all extraction is pure over a parsed
//! [`scraper::Html`] document so it can be tested without a network.

pub mod article;
pub mod listing;

use std::time::Duration;

use reqwest::Client;

use blogsmith_shared::{BlogsmithError, Result};

pub use article::extract_description;
pub use listing::{extract_summaries, last_page_url};

/// User-Agent string for scrape requests.
const USER_AGENT: &str = concat!("blogsmith/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by a pipeline run.
///
/// One uniform timeout applies to every request; there are no per-stage
/// overrides.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(timeout)
        .build()
        .map_err(|e| BlogsmithError::config(format!("failed to build HTTP client: {e}")))
}

/// Fetch a page and return its body as text.
///
/// Non-2xx statuses and transport failures both map to
/// [`BlogsmithError::Fetch`]; the caller decides whether that is fatal.
pub async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| BlogsmithError::fetch(url, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(BlogsmithError::fetch(url, format!("HTTP {status}")));
    }

    response
        .text()
        .await
        .map_err(|e| BlogsmithError::fetch(url, format!("body read failed: {e}")))
}
