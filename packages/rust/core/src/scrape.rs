//! Scrape pipeline: listing → last page → per-card detail fetch → upsert.

use std::sync::Arc;

use scraper::Html;
use tracing::{info, instrument, warn};
use url::Url;

use blogsmith_corpus::{CorpusClient, CorpusStore};
use blogsmith_scraper::{build_client, extract_description, extract_summaries, fetch_html, last_page_url};
use blogsmith_shared::{ArticleDraft, DEFAULT_DESCRIPTION, PipelineConfig, Result};

/// Outcome of one scrape run.
///
/// A run never aborts on a per-item failure: every card found on the
/// listing page ends up either ingested or in `skipped` with a reason.
#[derive(Debug, Default)]
pub struct ScrapeReport {
    /// Records written to the store.
    pub ingested: usize,
    /// Items whose detail fetch failed; ingested with the default
    /// description, listed here as `(detail_url, reason)`.
    pub defaulted: Vec<(String, String)>,
    /// Items whose store write failed, as `(source_url, reason)`.
    pub skipped: Vec<(String, String)>,
}

/// Runs the scrape pipeline against the configured blog listing.
pub struct ScrapeOrchestrator {
    config: PipelineConfig,
    store: Arc<dyn CorpusStore>,
}

impl ScrapeOrchestrator {
    pub fn new(config: PipelineConfig, store: Arc<dyn CorpusStore>) -> Self {
        Self { config, store }
    }

    /// Wire up the orchestrator against the real persistence API.
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        let http = build_client(config.http_timeout)?;
        let store = Arc::new(CorpusClient::new(http, config.api_base_url.clone()));
        Ok(Self::new(config, store))
    }

    /// Run one scrape batch.
    ///
    /// Fetching the listing itself is fatal; everything per-card is
    /// isolated so one bad item cannot abort the rest of the batch.
    #[instrument(skip_all, fields(listing = %self.config.listing_url))]
    pub async fn run(&self) -> Result<ScrapeReport> {
        let client = build_client(self.config.http_timeout)?;

        info!(limit = self.config.listing_limit, "starting scrape run");

        // Resolve the last paginated page; no pagination control means the
        // root listing page is the one to scrape.
        let root_html = fetch_html(&client, self.config.listing_url.as_str()).await?;
        let last_page = {
            let doc = Html::parse_document(&root_html);
            last_page_url(&doc, &self.config.listing_url)
        };

        let (page_url, page_html): (Url, String) = match last_page {
            Some(url) => {
                info!(last_page = %url, "pagination found, scraping last page");
                let html = fetch_html(&client, url.as_str()).await?;
                (url, html)
            }
            None => {
                info!("no pagination control, scraping root listing page");
                (self.config.listing_url.clone(), root_html)
            }
        };

        let summaries = {
            let doc = Html::parse_document(&page_html);
            extract_summaries(&doc, &page_url, self.config.listing_limit)
        };

        info!(cards = summaries.len(), "extracted listing cards");

        let mut report = ScrapeReport::default();

        for summary in summaries {
            // A detail fetch failure is absorbed: the record is still
            // ingested with the default description so a run always yields
            // one record per card found.
            let content = match fetch_html(&client, summary.detail_url.as_str()).await {
                Ok(html) => extract_description(&html),
                Err(e) => {
                    warn!(url = %summary.detail_url, error = %e, "detail fetch failed, ingesting with default description");
                    report
                        .defaulted
                        .push((summary.detail_url.to_string(), e.to_string()));
                    DEFAULT_DESCRIPTION.to_string()
                }
            };

            let draft =
                ArticleDraft::original(&summary.title, summary.detail_url.as_str(), content);

            match self.store.upsert_article(&draft).await {
                Ok(record) => {
                    info!(id = %record.id, source_url = %record.source_url, "upserted article");
                    report.ingested += 1;
                }
                Err(e) => {
                    warn!(source_url = %draft.source_url, error = %e, "upsert failed, skipping item");
                    report.skipped.push((draft.source_url.clone(), e.to_string()));
                }
            }
        }

        info!(
            ingested = report.ingested,
            defaulted = report.defaulted.len(),
            skipped = report.skipped.len(),
            "scrape run complete"
        );

        Ok(report)
    }
}
