//! Pipeline configuration for blogsmith.
//!
//! All settings come from the process environment, read once at startup and
//! threaded explicitly into the orchestrators. Nothing reads the environment
//! mid-pipeline.

use std::time::Duration;

use url::Url;

use crate::error::{BlogsmithError, Result};

/// Default blog listing to scrape.
const DEFAULT_LISTING_URL: &str = "https://beyondchats.com/blogs/";

/// Default generative model for the rewrite stage.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Maximum number of listing cards ingested per scrape run.
const DEFAULT_LISTING_LIMIT: usize = 5;

/// Maximum number of reference URLs used per enhancement run.
const DEFAULT_REFERENCE_LIMIT: usize = 2;

/// Uniform client-level HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Completion-token budget for the rewrite request.
const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 2000;

// ---------------------------------------------------------------------------
// PipelineConfig
// ---------------------------------------------------------------------------

/// Runtime configuration for both pipelines.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root URL of the blog listing to scrape.
    pub listing_url: Url,
    /// Base URL of the persistence API (e.g. `https://host/api`).
    pub api_base_url: String,
    /// Credential for the generative text service.
    pub openai_api_key: String,
    /// Credential for the web-search service.
    pub search_api_key: String,
    /// Generative model identifier.
    pub model: String,
    /// Cards taken from the resolved listing page.
    pub listing_limit: usize,
    /// Reference URLs retained after filtering.
    pub reference_limit: usize,
    /// Uniform timeout applied to every HTTP client.
    pub http_timeout: Duration,
    /// Output-length budget for the rewrite completion.
    pub max_completion_tokens: u32,
}

impl PipelineConfig {
    /// Build the config from the process environment.
    ///
    /// `BLOGSMITH_API_URL` is required; service credentials are validated
    /// lazily per pipeline (the scrape pipeline needs neither key).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup (injectable for tests).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_base_url = get("BLOGSMITH_API_URL")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                BlogsmithError::config("BLOGSMITH_API_URL is not set (persistence API base URL)")
            })?;

        let listing_url = match get("BLOGSMITH_LISTING_URL") {
            Some(raw) if !raw.is_empty() => Url::parse(&raw).map_err(|e| {
                BlogsmithError::config(format!("invalid BLOGSMITH_LISTING_URL '{raw}': {e}"))
            })?,
            _ => Url::parse(DEFAULT_LISTING_URL).expect("default listing URL is valid"),
        };

        let timeout_secs = parse_or_default(&get, "BLOGSMITH_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            listing_url,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            openai_api_key: get("OPENAI_API_KEY").unwrap_or_default(),
            search_api_key: get("TAVILY_API_KEY").unwrap_or_default(),
            model: get("BLOGSMITH_MODEL")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            listing_limit: parse_or_default(&get, "BLOGSMITH_LISTING_LIMIT", DEFAULT_LISTING_LIMIT)?,
            reference_limit: parse_or_default(
                &get,
                "BLOGSMITH_REFERENCE_LIMIT",
                DEFAULT_REFERENCE_LIMIT,
            )?,
            http_timeout: Duration::from_secs(timeout_secs),
            max_completion_tokens: parse_or_default(
                &get,
                "BLOGSMITH_MAX_COMPLETION_TOKENS",
                DEFAULT_MAX_COMPLETION_TOKENS,
            )?,
        })
    }

    /// Check that the credentials the enhancement pipeline needs are present.
    pub fn validate_for_enhance(&self) -> Result<()> {
        if self.openai_api_key.is_empty() {
            return Err(BlogsmithError::config(
                "OPENAI_API_KEY is not set; the rewrite stage requires it",
            ));
        }
        if self.search_api_key.is_empty() {
            return Err(BlogsmithError::config(
                "TAVILY_API_KEY is not set; reference discovery requires it",
            ));
        }
        Ok(())
    }
}

/// Parse an optional numeric variable, falling back to the given default.
fn parse_or_default<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match get(name) {
        Some(raw) if !raw.is_empty() => raw
            .parse()
            .map_err(|e| BlogsmithError::config(format!("invalid {name} '{raw}': {e}"))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_applied_when_only_api_url_set() {
        let vars = env(&[("BLOGSMITH_API_URL", "https://store.example/api")]);
        let config = PipelineConfig::from_lookup(|k| vars.get(k).cloned()).expect("config");

        assert_eq!(config.api_base_url, "https://store.example/api");
        assert_eq!(config.listing_limit, 5);
        assert_eq!(config.reference_limit, 2);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.max_completion_tokens, 2000);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.listing_url.as_str(), "https://beyondchats.com/blogs/");
    }

    #[test]
    fn missing_api_url_is_a_config_error() {
        let result = PipelineConfig::from_lookup(|_| None);
        assert!(matches!(result, Err(BlogsmithError::Config { .. })));
    }

    #[test]
    fn trailing_slash_stripped_from_api_url() {
        let vars = env(&[("BLOGSMITH_API_URL", "https://store.example/api/")]);
        let config = PipelineConfig::from_lookup(|k| vars.get(k).cloned()).expect("config");
        assert_eq!(config.api_base_url, "https://store.example/api");
    }

    #[test]
    fn numeric_overrides_parsed() {
        let vars = env(&[
            ("BLOGSMITH_API_URL", "https://store.example/api"),
            ("BLOGSMITH_LISTING_LIMIT", "3"),
            ("BLOGSMITH_TIMEOUT_SECS", "30"),
        ]);
        let config = PipelineConfig::from_lookup(|k| vars.get(k).cloned()).expect("config");
        assert_eq!(config.listing_limit, 3);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_numeric_override_rejected() {
        let vars = env(&[
            ("BLOGSMITH_API_URL", "https://store.example/api"),
            ("BLOGSMITH_LISTING_LIMIT", "five"),
        ]);
        let result = PipelineConfig::from_lookup(|k| vars.get(k).cloned());
        assert!(result.is_err());
    }

    #[test]
    fn enhance_validation_requires_both_keys() {
        let vars = env(&[
            ("BLOGSMITH_API_URL", "https://store.example/api"),
            ("OPENAI_API_KEY", "sk-test"),
        ]);
        let config = PipelineConfig::from_lookup(|k| vars.get(k).cloned()).expect("config");
        let err = config.validate_for_enhance().unwrap_err();
        assert!(err.to_string().contains("TAVILY_API_KEY"));
    }
}
