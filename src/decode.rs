//! JSON payloads from the text-generation service, optionally wrapped in a
//! markdown code fence. Decoding is two explicit steps: locate the payload,
//! then strict-parse it.

use serde::de::DeserializeOwned;

use crate::error::DecodeError;

const FENCE: &str = "```";

/// Returns the JSON text inside a fenced block, or the whole reply when it is
/// bare JSON.
pub fn unwrap_payload(raw: &str) -> Result<&str, DecodeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::Empty);
    }

    if let Some(open) = trimmed.find(FENCE) {
        let after_open = &trimmed[open + FENCE.len()..];
        // info string, e.g. ```json
        let tag_len = after_open
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(after_open.len());
        let body = &after_open[tag_len..];
        let close = body
            .find(FENCE)
            .ok_or_else(|| DecodeError::UnterminatedFence { raw: raw.to_string() })?;
        return Ok(body[..close].trim());
    }

    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        Ok(trimmed)
    } else {
        Err(DecodeError::NoPayload { raw: raw.to_string() })
    }
}

pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, DecodeError> {
    let payload = unwrap_payload(raw)?;
    serde_json::from_str(payload).map_err(|source| DecodeError::InvalidJson {
        raw: raw.to_string(),
        source,
    })
}
