use std::sync::Arc;

use crate::generation::pipeline::GenerationPipeline;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; every request runs its own pipeline pass.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: GenerationPipeline,
    /// Include diagnostic `details` in error bodies (APP_ENV=development).
    pub development: bool,
}

impl AppState {
    pub fn new(llm: Arc<dyn CompletionClient>, development: bool) -> Self {
        Self {
            pipeline: GenerationPipeline::new(llm),
            development,
        }
    }
}
