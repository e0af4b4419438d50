//! Helpers for reading JSON out of model output

use crate::{CompletionResponse, LLMError, Result, StopReason};
use serde::de::DeserializeOwned;

/// Strip surrounding whitespace and a Markdown code fence, if any
///
/// Models occasionally wrap JSON-mode output in ```` ```json ```` fences.
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Skip the info string (e.g. "json") up to the first newline
    let body = rest.find('\n').map_or("", |idx| &rest[idx + 1..]);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse model output into `T`
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    let body = extract_json(text);
    if body.is_empty() {
        return Err(LLMError::EmptyResponse);
    }
    Ok(serde_json::from_str(body)?)
}

/// Parse the text of a JSON-mode completion into `T`
///
/// A reply cut off at the token limit is reported as
/// [`LLMError::Truncated`] instead of a parse failure on half an object.
pub fn parse_completion<T: DeserializeOwned>(response: &CompletionResponse) -> Result<T> {
    if response.stop_reason == StopReason::MaxTokens {
        return Err(LLMError::Truncated {
            output_tokens: response.usage.output_tokens,
        });
    }

    let text = response.message.text().ok_or(LLMError::EmptyResponse)?;
    parse_json(text)
}
