//! Reference discovery via an external web-search service.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use blogsmith_shared::{BlogsmithError, Result};

const TAVILY_API_URL: &str = "https://api.tavily.com";

/// A single result from the search service, in service ranking order.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
}

/// Web-search interface used for reference discovery.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Query by free text; results keep the service's ranking order.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

/// Keep candidate URLs that use a secure scheme and look like editorial
/// content (URL contains "blog" or "article"), preserving order, up to
/// `limit`. Zero matches is a valid, non-error result.
pub fn filter_reference_urls(hits: &[SearchHit], limit: usize) -> Vec<Url> {
    hits.iter()
        .filter_map(|hit| Url::parse(&hit.url).ok())
        .filter(|url| url.scheme() == "https")
        .filter(|url| {
            let s = url.as_str();
            s.contains("blog") || s.contains("article")
        })
        .take(limit)
        .collect()
}

// ---------------------------------------------------------------------------
// Tavily client
// ---------------------------------------------------------------------------

/// Search request body.
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    url: String,
    #[serde(default)]
    title: String,
}

/// Tavily-backed [`SearchService`].
pub struct TavilySearch {
    api_key: String,
    http: Client,
    base_url: String,
}

impl TavilySearch {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http,
            base_url: TAVILY_API_URL.to_string(),
        }
    }

    /// Override the service endpoint (for tests against a mock server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl SearchService for TavilySearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let url = format!("{}/search", self.base_url);
        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results,
        };

        debug!(query, max_results, "querying search service");

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BlogsmithError::Upstream(format!("search request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlogsmithError::Upstream(format!(
                "search service error {status}: {body}"
            )));
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| BlogsmithError::Upstream(format!("malformed search response: {e}")))?;

        Ok(parsed
            .results
            .into_iter()
            .map(|r| SearchHit {
                url: r.url,
                title: r.title,
            })
            .collect())
    }
}
