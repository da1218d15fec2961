//! JSON recovery for LLM output.
//!
//! Models asked for "valid JSON only" still wrap payloads in prose, markdown
//! fences, or trailing commentary. [`extract_json`] tries a fixed sequence of
//! recovery strategies before giving up with a preview of the offending text.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Characters of input kept in the failure message
const PREVIEW_CHARS: usize = 200;

static CODE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)```").expect("code block pattern"));

/// Raised when no strategy recovers a JSON document
#[derive(Debug, Clone, thiserror::Error)]
#[error("could not extract JSON from response: {preview}...")]
pub struct JsonExtractError {
    pub preview: String,
}

/// Truncate text to at most `max_chars` characters for logs and error messages
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Recover a JSON value from raw model output
///
/// Strategies, in order:
/// 1. direct parse when the trimmed input starts with `{` or `[`
/// 2. the body of the first fenced code block
/// 3. the substring from the first `{` to the last `}`
/// 4. the substring from the first `[` to the last `]`
pub fn extract_json(raw: &str) -> Result<Value, JsonExtractError> {
    let trimmed = raw.trim();
    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && let Ok(value) = serde_json::from_str(trimmed)
    {
        return Ok(value);
    }

    if let Some(captures) = CODE_BLOCK.captures(raw)
        && let Some(block) = captures.get(1)
        && let Ok(value) = serde_json::from_str(block.as_str().trim())
    {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}'))
        && start < end
        && let Ok(value) = serde_json::from_str(&raw[start..=end])
    {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (raw.find('['), raw.rfind(']'))
        && start < end
        && let Ok(value) = serde_json::from_str(&raw[start..=end])
    {
        return Ok(value);
    }

    Err(JsonExtractError {
        preview: preview(raw, PREVIEW_CHARS),
    })
}
