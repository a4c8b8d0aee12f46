//! Shared types, error model, and configuration for blogsmith.
//!
//! This crate is the foundation depended on by all other blogsmith crates.
//! It provides:
//! - [`BlogsmithError`] — the unified error type
//! - Domain types ([`ArticleRecord`], [`ArticleDraft`], [`ArticleSummary`], [`ReferenceBlock`])
//! - Configuration ([`PipelineConfig`], read once from the environment)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::PipelineConfig;
pub use error::{BlogsmithError, Result};
pub use types::{
    ArticleDraft, ArticleId, ArticleRecord, ArticleSummary, DEFAULT_DESCRIPTION, DEFAULT_LINK,
    DEFAULT_TITLE, ReferenceBlock, ReferenceLink,
};
