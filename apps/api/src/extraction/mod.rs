//! Response extraction: isolates the JSON object inside free-form completion text.
//!
//! Models are told to answer with bare JSON but frequently wrap it in a
//! ```` ```json ```` fence or surround it with prose. Two strategies run in order:
//!
//! 1. Fenced block: text between the first fence (minus a `json` tag) and the
//!    next fence, or the end of the text when the fence is never closed. If it
//!    is `{ ... }` it is the candidate, otherwise its brace span is tried.
//! 2. Greedy brace: the first `{` through the last `}` of the whole text.
//!
//! The result may still be invalid JSON; parsing is the validator's job.

use thiserror::Error;

const FENCE: &str = "```";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("No JSON object found in completion text")]
    NoJsonFound,
}

/// Returns the JSON object substring of `raw`.
pub fn extract_json(raw: &str) -> Result<&str, ExtractError> {
    let text = raw.trim().trim_start_matches('\u{feff}').trim();

    if let Some(block) = fenced_block(text) {
        if block.starts_with('{') && block.ends_with('}') {
            return Ok(block);
        }
        if let Some(span) = greedy_brace_span(block) {
            return Ok(span);
        }
    }

    greedy_brace_span(text).ok_or(ExtractError::NoJsonFound)
}

/// Contents of the first ```json ... ``` or ``` ... ``` block, trimmed.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find(FENCE)?;
    let rest = strip_json_tag(&text[start + FENCE.len()..]);
    let block = match rest.find(FENCE) {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(block.trim())
}

/// Removes a `json` language tag directly after an opening fence.
fn strip_json_tag(text: &str) -> &str {
    match text.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &text[4..],
        _ => text,
    }
}

/// First `{` through last `}`, inclusive. Nested objects are not balanced.
fn greedy_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
