//! Enhancement stages: reference discovery, reference extraction, rewrite,
//! and publish.
//!
//! Only reference extraction is failure-tolerant; every other stage is
//! single-shot and fatal to the enhancement run when it errors.

pub mod publish;
pub mod references;
pub mod rewrite;
pub mod search;

pub use publish::publish_enhanced;
pub use references::{collect_paragraphs, extract_reference_text};
pub use rewrite::{OpenAiRewriter, RewriteService};
pub use search::{SearchHit, SearchService, TavilySearch, filter_reference_urls};
