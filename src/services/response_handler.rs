use serde_json::Value;

use crate::error::{GenerationError, Result};

fn candidate_parts(response: &Value) -> impl Iterator<Item = &Value> {
    response
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Concatenated text of the first candidate, skipping thought parts.
///
/// A prompt rejected by the safety filter surfaces as `Blocked`; no text at all as
/// `EmptyResponse`.
pub(crate) fn extract_text(response: &Value) -> Result<String> {
    if let Some(reason) = response
        .get("promptFeedback")
        .and_then(|feedback| feedback.get("blockReason"))
        .and_then(Value::as_str)
    {
        return Err(GenerationError::Blocked(reason.to_string()));
    }

    let text: String = candidate_parts(response)
        .filter(|part| !part.get("thought").and_then(Value::as_bool).unwrap_or(false))
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    Ok(text)
}

/// `(mimeType, base64 data)` of the first inline part, if any.
pub(crate) fn first_inline_data(response: &Value) -> Option<(&str, &str)> {
    candidate_parts(response).find_map(|part| {
        let inline = part.get("inlineData").or_else(|| part.get("inline_data"))?;
        let mime_type = inline
            .get("mimeType")
            .or_else(|| inline.get("mime_type"))
            .and_then(Value::as_str)?;
        let data = inline.get("data").and_then(Value::as_str)?;
        Some((mime_type, data))
    })
}

pub(crate) fn finish_reason(response: &Value) -> Option<&str> {
    response
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("finishReason"))
        .and_then(Value::as_str)
}
