//! Provider Chunk Adapters
//!
//! One [`ChunkAdapter`](crate::streaming::ChunkAdapter) per provider family.
//! Each adapter takes one decoded JSON payload (see
//! [`sse_json_values`](crate::streaming::sse_json_values)) and normalizes it
//! into a [`Chunk`](crate::types::Chunk).

#[cfg(feature = "openai")]
pub mod pricing;

#[cfg(feature = "anthropic")]
pub mod anthropic;
#[cfg(feature = "groq")]
pub mod groq;
#[cfg(feature = "openai")]
pub mod openai;

#[cfg(any(feature = "openai", feature = "anthropic"))]
use crate::error::TransportError;

/// Detect an in-stream provider error object (`{"error": {...}}`).
///
/// Both the OpenAI family and Anthropic use this shape; the error `type`
/// is kept in the message so retry classification can see it.
#[cfg(any(feature = "openai", feature = "anthropic"))]
pub(crate) fn provider_error(value: &serde_json::Value) -> Option<TransportError> {
    let error = value.get("error")?;
    if !error.is_object() {
        return None;
    }
    let message = error
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("unknown error");
    let message = match error.get("type").and_then(|t| t.as_str()) {
        Some(kind) => format!("{kind}: {message}"),
        None => message.to_string(),
    };
    Some(TransportError::provider(message))
}
