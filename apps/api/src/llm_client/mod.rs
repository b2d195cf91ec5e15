//! LLM Client: the single point of entry for all completion-service calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! Handlers depend on the `CompletionClient` trait; `GeminiClient` is the
//! production backend and is constructed once at startup from `Config`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
#[cfg(test)]
pub mod testing;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Completion service credential is not configured")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Prompt was blocked by the completion service: {0}")]
    Blocked(String),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Completion call exceeded its {}s deadline", .0.as_secs())]
    DeadlineExceeded(Duration),
}

impl LlmError {
    /// True when the service could not be reached or reported itself
    /// unavailable. Surfaces to callers as 503 instead of 500.
    pub fn is_unavailable(&self) -> bool {
        match self {
            LlmError::Api { status, .. } => *status == 503,
            LlmError::Http(e) => e.is_connect() || e.is_timeout(),
            LlmError::DeadlineExceeded(_) => true,
            _ => false,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            LlmError::Http(_) => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Attempt, backoff, and deadline settings for outbound completion calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionPolicy {
    /// Total attempts including the first. `1` disables retries.
    pub max_attempts: u32,
    /// Backoff before attempt `n` is `initial_backoff * 2^(n-2)`.
    pub initial_backoff: Duration,
    /// Upper bound on the whole call, retries included.
    pub deadline: Duration,
}

impl Default for CompletionPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::from_millis(1000),
            deadline: Duration::from_secs(60),
        }
    }
}

impl CompletionPolicy {
    fn backoff_before(&self, attempt: u32) -> Duration {
        // attempt is 1-based; no delay before the first one
        if attempt <= 1 {
            return Duration::ZERO;
        }
        self.initial_backoff
            .saturating_mul(1u32 << (attempt - 2).min(16))
    }
}

/// The completion seam. Implement this to swap the remote model backend
/// without touching handlers or the extraction pipeline.
///
/// Carried in `AppState` as `Arc<dyn CompletionClient>`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends `prompt` and returns the raw completion text.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    /// Fails when the prompt was blocked or nothing usable came back.
    pub fn into_text(self) -> Result<String, LlmError> {
        let blocked = self.prompt_feedback.and_then(|f| f.block_reason);

        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        if !text.trim().is_empty() {
            return Ok(text);
        }
        match blocked {
            Some(reason) => Err(LlmError::Blocked(reason)),
            None => Err(LlmError::EmptyContent),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// GeminiClient: production backend
// ────────────────────────────────────────────────────────────────────────────

/// Wraps the Gemini `generateContent` endpoint with the configured retry
/// and deadline policy.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    policy: CompletionPolicy,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        policy: CompletionPolicy,
    ) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingCredential);
        }
        let client = Client::builder().timeout(policy.deadline).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    async fn call_once(&self, body: &GenerateContentRequest<'_>) -> Result<String, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        parsed.into_text()
    }

    async fn call_with_retries(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let mut attempt = 1;
        loop {
            match self.call_once(&request_body).await {
                Ok(text) => {
                    debug!(
                        "Completion call succeeded on attempt {attempt}: {} chars",
                        text.len()
                    );
                    return Ok(text);
                }
                Err(e) if e.is_retryable() && attempt < self.policy.max_attempts => {
                    attempt += 1;
                    let delay = self.policy.backoff_before(attempt);
                    warn!(
                        "Completion call failed ({e}), retrying attempt {attempt} after {}ms...",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        tokio::time::timeout(self.policy.deadline, self.call_with_retries(prompt))
            .await
            .map_err(|_| LlmError::DeadlineExceeded(self.policy.deadline))?
    }
}
