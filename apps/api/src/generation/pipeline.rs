//! Generation pipeline: prompt → completion → extraction → validation.
//!
//! Stages run strictly in order and short-circuit on the first failure.
//! Nothing is retried here: a completion with unusable content is an error,
//! transport retries belong to the `CompletionClient` policy.

use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::AppError;
use crate::extraction::extract_json;
use crate::llm_client::{CompletionClient, LlmError};
use crate::validation::{validate, StructuredResult};

#[derive(Clone)]
pub struct GenerationPipeline {
    client: Arc<dyn CompletionClient>,
}

impl GenerationPipeline {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Runs the full pipeline and returns a validated `T`.
    pub async fn generate<T: StructuredResult>(&self, prompt: &str) -> Result<T, AppError> {
        let raw = self.client.complete(prompt).await?;
        debug!("Received {} chars for {}", raw.len(), T::KIND);

        let json_text = extract_json(&raw).inspect_err(|_| {
            debug!("No JSON object in {} completion: {raw}", T::KIND);
        })?;

        let result = validate::<T>(json_text).inspect_err(|e| {
            debug!("Rejected {} completion ({e}): {json_text}", T::KIND);
        })?;

        info!("Generated {}", T::KIND);
        Ok(result)
    }

    /// Plain-text generation. Only rejects an empty completion.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, AppError> {
        let raw = self.client.complete(prompt).await?;
        let text = raw.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyContent.into());
        }
        Ok(text.to_string())
    }
}
