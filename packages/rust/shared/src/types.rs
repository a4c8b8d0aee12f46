//! Core domain types for the blogsmith article corpus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Title substituted when a listing card has no heading element.
pub const DEFAULT_TITLE: &str = "No Title";

/// Link placeholder substituted when a listing card has no anchor.
pub const DEFAULT_LINK: &str = "#";

/// Content substituted when a detail page has no paragraph element, or when
/// the store returns a record without content.
pub const DEFAULT_DESCRIPTION: &str = "No description available";

// ---------------------------------------------------------------------------
// ArticleId
// ---------------------------------------------------------------------------

/// Identifier assigned by the external store to each article record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub i64);

impl std::fmt::Display for ArticleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ArticleId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

// ---------------------------------------------------------------------------
// ArticleRecord
// ---------------------------------------------------------------------------

/// An article record as served by the persistence API.
///
/// `source_url` is the natural key: re-ingesting the same URL updates the
/// existing record rather than duplicating it. Enhanced derivatives carry a
/// `parent_id` referencing the original record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    /// Store-assigned identifier.
    pub id: ArticleId,
    /// Display name.
    pub title: String,
    /// Natural key, derived from the scraped detail page URL.
    pub source_url: String,
    /// Lead description or full body text.
    #[serde(default = "default_content")]
    pub content: String,
    /// Set by the store on first insert, never mutated on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Present only on enhanced derivatives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ArticleId>,
    /// Enrichment metadata consumed by downstream presentation only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ReferenceLink>,
}

fn default_content() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

impl ArticleRecord {
    /// An enhanced record always has a parent; an original never does.
    pub fn is_enhanced(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// A reference link attached to an enhanced article for presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceLink {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// ArticleDraft
// ---------------------------------------------------------------------------

/// Fields sent to the store when creating or upserting a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    pub title: String,
    pub source_url: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ArticleId>,
}

impl ArticleDraft {
    /// Draft for an original article ingested by the scrape pipeline.
    pub fn original(
        title: impl Into<String>,
        source_url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            source_url: source_url.into(),
            content: content.into(),
            parent_id: None,
        }
    }

    /// Draft for an enhanced derivative linked to its original.
    ///
    /// The derived `source_url` is the original URL plus an `-ai` suffix;
    /// repeat runs against the same original are not guarded here and rely
    /// on the store's uniqueness rules.
    pub fn enhanced(original: &ArticleRecord, content: impl Into<String>) -> Self {
        Self {
            title: original.title.clone(),
            source_url: format!("{}-ai", original.source_url),
            content: content.into(),
            parent_id: Some(original.id),
        }
    }
}

// ---------------------------------------------------------------------------
// ArticleSummary
// ---------------------------------------------------------------------------

/// A single card extracted from the blog listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSummary {
    /// Heading text, or [`DEFAULT_TITLE`] when the card has no heading.
    pub title: String,
    /// Absolute URL of the detail page.
    pub detail_url: Url,
}

// ---------------------------------------------------------------------------
// ReferenceBlock
// ---------------------------------------------------------------------------

/// Extracted reference text paired with its source URL, used as style and
/// structure guidance for the rewrite prompt.
#[derive(Debug, Clone)]
pub struct ReferenceBlock {
    pub url: Url,
    /// Extracted paragraph text; empty when extraction failed for this URL.
    pub text: String,
}

impl ReferenceBlock {
    /// Render the block the way the rewrite prompt expects it.
    pub fn render(&self) -> String {
        format!("{}\nSource: {}", self.text, self.url)
    }
}
