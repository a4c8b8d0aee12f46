//! Enhancement pipeline: latest article → reference discovery → rewrite →
//! parent-linked publish.

use std::sync::Arc;

use reqwest::Client;
use tracing::{info, instrument, warn};

use blogsmith_corpus::{CorpusClient, CorpusStore};
use blogsmith_enhance::{
    OpenAiRewriter, RewriteService, SearchService, TavilySearch, extract_reference_text,
    filter_reference_urls, publish_enhanced,
};
use blogsmith_scraper::build_client;
use blogsmith_shared::{ArticleId, PipelineConfig, ReferenceBlock, Result};

/// Results requested from the search service before filtering.
const SEARCH_PAGE_SIZE: usize = 10;

/// Outcome of one enhancement run.
#[derive(Debug)]
pub struct EnhanceReport {
    pub original_id: ArticleId,
    pub published_id: ArticleId,
    pub published_source_url: String,
    /// References that made it into the prompt, including ones whose text
    /// extraction came back empty.
    pub reference_count: usize,
}

/// Runs the enhancement pipeline against the latest stored article.
pub struct EnhanceOrchestrator {
    store: Arc<dyn CorpusStore>,
    search: Arc<dyn SearchService>,
    rewriter: Arc<dyn RewriteService>,
    http: Client,
    reference_limit: usize,
}

impl std::fmt::Debug for EnhanceOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnhanceOrchestrator")
            .field("reference_limit", &self.reference_limit)
            .finish_non_exhaustive()
    }
}

impl EnhanceOrchestrator {
    pub fn new(
        store: Arc<dyn CorpusStore>,
        search: Arc<dyn SearchService>,
        rewriter: Arc<dyn RewriteService>,
        http: Client,
        reference_limit: usize,
    ) -> Self {
        Self {
            store,
            search,
            rewriter,
            http,
            reference_limit,
        }
    }

    /// Wire up the orchestrator against the real services.
    ///
    /// Fails fast when either service credential is missing, before any
    /// network traffic happens.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate_for_enhance()?;

        let http = build_client(config.http_timeout)?;
        let store = Arc::new(CorpusClient::new(http.clone(), config.api_base_url.clone()));
        let search = Arc::new(TavilySearch::new(
            http.clone(),
            config.search_api_key.clone(),
        ));
        let rewriter = Arc::new(OpenAiRewriter::new(
            http.clone(),
            config.openai_api_key.clone(),
            config.model.clone(),
            config.max_completion_tokens,
        ));

        Ok(Self::new(store, search, rewriter, http, config.reference_limit))
    }

    /// Run one enhancement pass.
    ///
    /// Reference extraction degrades gracefully; everything else is fatal
    /// and leaves the store untouched.
    #[instrument(skip_all)]
    pub async fn run(&self) -> Result<EnhanceReport> {
        let original = self.store.latest_article().await?;
        info!(id = %original.id, title = %original.title, "enhancing latest article");

        let hits = self.search.search(&original.title, SEARCH_PAGE_SIZE).await?;
        let reference_urls = filter_reference_urls(&hits, self.reference_limit);

        if reference_urls.is_empty() {
            warn!("no usable reference URLs, rewriting without references");
        }

        let mut references = Vec::with_capacity(reference_urls.len());
        for url in reference_urls {
            let text = extract_reference_text(&self.http, &url).await;
            references.push(ReferenceBlock { url, text });
        }

        let rewritten = self
            .rewriter
            .rewrite(&original.content, &references)
            .await?;

        let published = publish_enhanced(self.store.as_ref(), &original, &rewritten).await?;

        info!(
            original_id = %original.id,
            published_id = %published.id,
            references = references.len(),
            "enhancement run complete"
        );

        Ok(EnhanceReport {
            original_id: original.id,
            published_id: published.id,
            published_source_url: published.source_url,
            reference_count: references.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use blogsmith_enhance::SearchHit;
    use blogsmith_shared::{ArticleDraft, ArticleRecord, BlogsmithError};
    use std::sync::Mutex;

    struct FakeStore {
        latest: Option<ArticleRecord>,
        created: Mutex<Vec<ArticleDraft>>,
    }

    impl FakeStore {
        fn with_latest(record: ArticleRecord) -> Self {
            Self {
                latest: Some(record),
                created: Mutex::new(vec![]),
            }
        }

        fn empty() -> Self {
            Self {
                latest: None,
                created: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl CorpusStore for FakeStore {
        async fn list_articles(&self) -> Result<Vec<ArticleRecord>> {
            Ok(self.latest.clone().into_iter().collect())
        }

        async fn upsert_article(&self, _draft: &ArticleDraft) -> Result<ArticleRecord> {
            unimplemented!("not used by enhance")
        }

        async fn create_article(&self, draft: &ArticleDraft) -> Result<ArticleRecord> {
            self.created.lock().unwrap().push(draft.clone());
            Ok(ArticleRecord {
                id: ArticleId(99),
                title: draft.title.clone(),
                source_url: draft.source_url.clone(),
                content: draft.content.clone(),
                created_at: None,
                parent_id: draft.parent_id,
                tags: vec![],
                views: None,
                references: vec![],
            })
        }
    }

    struct FakeSearch {
        hits: Vec<SearchHit>,
    }

    #[async_trait]
    impl SearchService for FakeSearch {
        async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<SearchHit>> {
            Ok(self.hits.clone())
        }
    }

    struct FakeRewriter {
        seen: Mutex<Vec<(String, usize)>>,
        fail: bool,
    }

    #[async_trait]
    impl RewriteService for FakeRewriter {
        async fn rewrite(
            &self,
            original: &str,
            references: &[ReferenceBlock],
        ) -> Result<String> {
            if self.fail {
                return Err(BlogsmithError::Upstream("quota exceeded".into()));
            }
            self.seen
                .lock()
                .unwrap()
                .push((original.to_string(), references.len()));
            Ok("<p>Rewritten.</p>".to_string())
        }
    }

    fn latest() -> ArticleRecord {
        ArticleRecord {
            id: ArticleId(3),
            title: "How chatbots work".into(),
            source_url: "https://site/post/3".into(),
            content: "Original body.".into(),
            created_at: None,
            parent_id: None,
            tags: vec![],
            views: None,
            references: vec![],
        }
    }

    fn orchestrator(
        store: Arc<FakeStore>,
        search: FakeSearch,
        rewriter: Arc<FakeRewriter>,
    ) -> EnhanceOrchestrator {
        EnhanceOrchestrator::new(store, Arc::new(search), rewriter, Client::new(), 2)
    }

    #[tokio::test]
    async fn publishes_rewrite_of_latest_article() {
        let store = Arc::new(FakeStore::with_latest(latest()));
        let rewriter = Arc::new(FakeRewriter {
            seen: Mutex::new(vec![]),
            fail: false,
        });
        // One hit survives the filter; its host does not resolve, so the
        // extraction degrades to an empty block and the run proceeds.
        let search = FakeSearch {
            hits: vec![
                SearchHit {
                    url: "https://x.invalid/blog/1".into(),
                    title: "First".into(),
                },
                SearchHit {
                    url: "https://z.invalid/news/3".into(),
                    title: "Filtered".into(),
                },
            ],
        };

        let report = orchestrator(store.clone(), search, rewriter.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(report.original_id, ArticleId(3));
        assert_eq!(report.published_id, ArticleId(99));
        assert_eq!(report.published_source_url, "https://site/post/3-ai");
        assert_eq!(report.reference_count, 1);

        let created = store.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].parent_id, Some(ArticleId(3)));
        assert_eq!(created[0].content, "<p>Rewritten.</p>");

        let seen = rewriter.seen.lock().unwrap();
        assert_eq!(seen[0].0, "Original body.");
        assert_eq!(seen[0].1, 1);
    }

    #[tokio::test]
    async fn empty_store_aborts_before_any_service_call() {
        let store = Arc::new(FakeStore::empty());
        let rewriter = Arc::new(FakeRewriter {
            seen: Mutex::new(vec![]),
            fail: false,
        });
        let search = FakeSearch { hits: vec![] };

        let err = orchestrator(store.clone(), search, rewriter.clone())
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, BlogsmithError::EmptyCorpus));
        assert!(store.created.lock().unwrap().is_empty());
        assert!(rewriter.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_usable_references_still_rewrites() {
        let store = Arc::new(FakeStore::with_latest(latest()));
        let rewriter = Arc::new(FakeRewriter {
            seen: Mutex::new(vec![]),
            fail: false,
        });
        // Insecure and non-editorial URLs are all filtered out.
        let search = FakeSearch {
            hits: vec![
                SearchHit {
                    url: "http://y.com/article/2".into(),
                    title: String::new(),
                },
                SearchHit {
                    url: "https://z.com/news/3".into(),
                    title: String::new(),
                },
            ],
        };

        let report = orchestrator(store.clone(), search, rewriter.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(report.reference_count, 0);
        assert_eq!(store.created.lock().unwrap().len(), 1);
        assert_eq!(rewriter.seen.lock().unwrap()[0].1, 0);
    }

    #[tokio::test]
    async fn unreachable_reference_contributes_empty_block() {
        let store = Arc::new(FakeStore::with_latest(latest()));
        let rewriter = Arc::new(FakeRewriter {
            seen: Mutex::new(vec![]),
            fail: false,
        });
        // Resolves through the filter but the host does not exist; the
        // extraction failure is absorbed and the block still counts.
        let search = FakeSearch {
            hits: vec![SearchHit {
                url: "https://no-such-host.invalid/blog/1".into(),
                title: String::new(),
            }],
        };

        let report = orchestrator(store, search, rewriter.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(report.reference_count, 1);
        assert_eq!(rewriter.seen.lock().unwrap()[0].1, 1);
    }

    #[tokio::test]
    async fn rewrite_failure_publishes_nothing() {
        let store = Arc::new(FakeStore::with_latest(latest()));
        let rewriter = Arc::new(FakeRewriter {
            seen: Mutex::new(vec![]),
            fail: true,
        });
        let search = FakeSearch { hits: vec![] };

        let err = orchestrator(store.clone(), search, rewriter)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, BlogsmithError::Upstream(_)));
        assert!(store.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_credentials_fail_construction() {
        let vars: std::collections::HashMap<&str, String> =
            [("BLOGSMITH_API_URL", "https://store.example/api".to_string())]
                .into_iter()
                .collect();
        let config = PipelineConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();

        let err = EnhanceOrchestrator::from_config(&config).unwrap_err();
        assert!(matches!(err, BlogsmithError::Config { .. }));
    }
}
