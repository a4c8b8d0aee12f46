//! Rewrite stage: prompt construction and the generative-service client.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use blogsmith_shared::{BlogsmithError, ReferenceBlock, Result};

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Generative rewrite interface.
///
/// A failure here (quota, network, malformed response) is fatal to the
/// enhancement run: no partial publish happens.
#[async_trait]
pub trait RewriteService: Send + Sync {
    async fn rewrite(&self, original: &str, references: &[ReferenceBlock]) -> Result<String>;
}

/// Build the single-turn rewrite prompt from the original content and the
/// rendered reference blocks. References may be empty or carry empty text;
/// the prompt shape stays the same.
pub fn build_rewrite_prompt(original: &str, references: &[ReferenceBlock]) -> String {
    let rendered: Vec<String> = references.iter().map(ReferenceBlock::render).collect();

    format!(
        "You are an expert content writer.\n\
         Update the following article to match the style, clarity, and structure \
         of these reference articles:\n\
         \n\
         References:\n\
         {}\n\
         \n\
         Original Article:\n\
         {}\n\
         \n\
         Return clean, well-formatted HTML, and include reference links at the bottom.\n",
        rendered.join("\n\n"),
        original
    )
}

// ---------------------------------------------------------------------------
// Chat-completion wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// OpenAiRewriter
// ---------------------------------------------------------------------------

/// [`RewriteService`] backed by the OpenAI chat-completions API.
pub struct OpenAiRewriter {
    api_key: String,
    model: String,
    max_completion_tokens: u32,
    http: Client,
    base_url: String,
}

impl OpenAiRewriter {
    pub fn new(
        http: Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_completion_tokens: u32,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            max_completion_tokens,
            http,
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Override the service endpoint (for tests against a mock server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| BlogsmithError::config(format!("invalid API key: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl RewriteService for OpenAiRewriter {
    async fn rewrite(&self, original: &str, references: &[ReferenceBlock]) -> Result<String> {
        let prompt = build_rewrite_prompt(original, references);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens: self.max_completion_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, references = references.len(), "requesting rewrite");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await
            .map_err(|e| BlogsmithError::Upstream(format!("rewrite request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlogsmithError::Upstream(format!(
                "generative service error {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| BlogsmithError::Upstream(format!("malformed completion: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| BlogsmithError::Upstream("no completion returned".into()))
    }
}
