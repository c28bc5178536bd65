//! SSE JSON transport helper
//!
//! Turns a byte stream of server-sent events into a stream of JSON values,
//! one per `data:` payload, ready to feed a JSON-based [`ChunkAdapter`].
//! Framing problems surface as [`StreamError::Transport`]; a payload that
//! is not JSON is a [`StreamError::MalformedChunk`] for the configured label.
//!
//! [`ChunkAdapter`]: super::ChunkAdapter

use eventsource_stream::Eventsource;
use futures::Stream;
use futures_util::StreamExt;
use std::fmt::Display;
use std::pin::Pin;

use crate::error::{StreamError, TransportError};

#[derive(Debug, Clone)]
pub struct SseJsonConfig {
    /// Label used in error messages (e.g. "openai" / "anthropic").
    pub label: String,
    /// SSE `data` payloads that mark end-of-stream and are skipped.
    pub done_markers: Vec<String>,
}

impl SseJsonConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            done_markers: vec!["[DONE]".to_string()],
        }
    }

    pub fn with_done_marker(mut self, marker: impl Into<String>) -> Self {
        self.done_markers.push(marker.into());
        self
    }
}

pub type JsonSseStream = Pin<Box<dyn Stream<Item = Result<serde_json::Value, StreamError>> + Send>>;

/// Parse SSE `data:` payloads from a byte stream as JSON.
///
/// Empty payloads, comments and done markers are skipped. The stream ends
/// after the first framing or JSON error.
pub fn sse_json_values<S, B, E>(byte_stream: S, config: SseJsonConfig) -> JsonSseStream
where
    S: Stream<Item = Result<B, E>> + Send + Unpin + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let SseJsonConfig {
        label,
        done_markers,
    } = config;

    let out = async_stream::stream! {
        let mut events = byte_stream.eventsource();

        while let Some(item) = events.next().await {
            let event = match item {
                Ok(event) => event,
                Err(e) => {
                    let error = TransportError::from(e);
                    tracing::debug!(label = %label, "SSE stream error: {error}");
                    yield Err(StreamError::Transport(error));
                    return;
                }
            };

            let data = event.data.trim();
            if data.is_empty() || done_markers.iter().any(|m| m == data) {
                continue;
            }

            match serde_json::from_str::<serde_json::Value>(data) {
                Ok(value) => yield Ok(value),
                Err(e) => {
                    tracing::debug!(label = %label, "undecodable SSE payload: {e}");
                    yield Err(StreamError::malformed(
                        label.as_str(),
                        format!("invalid JSON payload: {e}"),
                    ));
                    return;
                }
            }
        }
    };

    Box::pin(out)
}
