// Shared prompt fragments.
// Each generation flow defines its own templates in generation/prompts.rs;
// this file holds the cross-cutting instructions they append.

/// Appended to every prompt that expects a JSON answer.
pub const JSON_ONLY_INSTRUCTION: &str = "Return only the JSON object, with no additional text, \
    explanation, markdown formatting, or backticks.";
