//! Publishing of the rewritten article as a parent-linked derivative.

use tracing::info;

use blogsmith_corpus::CorpusStore;
use blogsmith_shared::{ArticleDraft, ArticleRecord, Result};

/// Create the derivative record for a rewrite of `original`.
///
/// The new record copies the original's title, derives its `source_url` as
/// `<original>-ai`, and links back via `parent_id`. Failures propagate as
/// [`blogsmith_shared::BlogsmithError::Publish`] with nothing written.
pub async fn publish_enhanced(
    store: &dyn CorpusStore,
    original: &ArticleRecord,
    rewritten: &str,
) -> Result<ArticleRecord> {
    let draft = ArticleDraft::enhanced(original, rewritten);
    let record = store.create_article(&draft).await?;

    info!(
        original_id = %original.id,
        published_id = %record.id,
        source_url = %record.source_url,
        "published enhanced article"
    );

    Ok(record)
}
