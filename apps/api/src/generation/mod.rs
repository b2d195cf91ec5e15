// Generation endpoints: interview questions, study plans, cover letters.
// All completion calls go through llm_client; no direct Gemini calls here.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod requests;
