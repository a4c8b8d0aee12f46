//! Error types for blogsmith.
//!
//! Library crates use [`BlogsmithError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

/// Top-level error type for all blogsmith operations.
#[derive(Debug, thiserror::Error)]
pub enum BlogsmithError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP failure retrieving a page or API resource.
    ///
    /// Recoverable per item in the extraction stages; fatal in single-shot
    /// stages (latest-article selection, rewrite, publish).
    #[error("fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Expected structural element absent from a page.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// No article available to select for enhancement.
    #[error("corpus is empty: no article available for enhancement")]
    EmptyCorpus,

    /// Search or generative service failure (quota, malformed response).
    #[error("upstream service error: {0}")]
    Upstream(String),

    /// Write of an enhanced article to the store failed.
    #[error("publish failed: {0}")]
    Publish(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlogsmithError>;

impl BlogsmithError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a fetch error tagged with the URL that failed.
    pub fn fetch(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }
}
