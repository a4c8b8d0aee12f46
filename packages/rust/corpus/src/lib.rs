//! Client for the external article store.
//!
//! The store is an HTTP API that serves the article feed newest-first and
//! accepts writes keyed by `sourceUrl`. It is the only shared resource
//! between runs; it serializes concurrent writers itself, so no client-side
//! locking happens here.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use blogsmith_shared::{ArticleDraft, ArticleRecord, BlogsmithError, Result};

// ---------------------------------------------------------------------------
// CorpusStore
// ---------------------------------------------------------------------------

/// Interface to the article store consumed by both pipelines.
#[async_trait]
pub trait CorpusStore: Send + Sync {
    /// All records, newest-first by creation time.
    async fn list_articles(&self) -> Result<Vec<ArticleRecord>>;

    /// Idempotent write keyed by `source_url`: repeated calls with the same
    /// key yield one record carrying the latest field values.
    async fn upsert_article(&self, draft: &ArticleDraft) -> Result<ArticleRecord>;

    /// Strict insert used by the publish stage. A natural-key conflict
    /// surfaces as [`BlogsmithError::Publish`].
    async fn create_article(&self, draft: &ArticleDraft) -> Result<ArticleRecord>;

    /// The most recently created record across the whole feed.
    ///
    /// No filter excludes already-enhanced records: "latest" is purely by
    /// creation time, so a prior derivative can be selected as the next
    /// original.
    async fn latest_article(&self) -> Result<ArticleRecord> {
        self.list_articles()
            .await?
            .into_iter()
            .next()
            .ok_or(BlogsmithError::EmptyCorpus)
    }
}

// ---------------------------------------------------------------------------
// CorpusClient
// ---------------------------------------------------------------------------

/// HTTP implementation of [`CorpusStore`] over the persistence API.
pub struct CorpusClient {
    http: Client,
    base_url: String,
}

impl CorpusClient {
    /// Create a client against `base_url` (e.g. `https://host/api`).
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn articles_url(&self) -> String {
        format!("{}/phase2/articles", self.base_url)
    }

    async fn post_article(&self, draft: &ArticleDraft) -> Result<ArticleRecord> {
        let url = self.articles_url();
        debug!(source_url = %draft.source_url, "writing article record");

        let response = self
            .http
            .post(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| BlogsmithError::fetch(&url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlogsmithError::fetch(&url, format!("HTTP {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| BlogsmithError::fetch(&url, format!("invalid record in response: {e}")))
    }
}

#[async_trait]
impl CorpusStore for CorpusClient {
    #[instrument(skip(self))]
    async fn list_articles(&self) -> Result<Vec<ArticleRecord>> {
        let url = self.articles_url();

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| BlogsmithError::fetch(&url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BlogsmithError::fetch(&url, format!("HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| BlogsmithError::fetch(&url, format!("invalid article feed: {e}")))
    }

    async fn upsert_article(&self, draft: &ArticleDraft) -> Result<ArticleRecord> {
        self.post_article(draft).await
    }

    async fn create_article(&self, draft: &ArticleDraft) -> Result<ArticleRecord> {
        // Same endpoint as upsert; the store applies its uniqueness rules.
        // A conflict on the derived key is a publish failure, not a fetch one.
        self.post_article(draft).await.map_err(|e| match e {
            BlogsmithError::Fetch { url, message } => {
                BlogsmithError::Publish(format!("{url}: {message}"))
            }
            other => other,
        })
    }
}
