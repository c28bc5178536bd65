//! Telemetry and Observability
//!
//! Read-only hooks for observing a stream while it is consumed and after it
//! completes. Observers never mutate stream state; span exporters
//! (OpenTelemetry, Langfuse, ...) live outside this crate and build on
//! [`gen_ai_attributes`] / [`gen_ai_events`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chatfold::telemetry::TracingObserver;
//!
//! let stream = ChatStream::new(source, OpenAiChunkAdapter::new())
//!     .with_observer(Arc::new(TracingObserver::new()));
//! ```

mod attributes;

pub use attributes::{GenAiEvent, gen_ai_attributes, gen_ai_events};

use crate::error::StreamError;
use crate::streaming::AccumulatedState;
use crate::types::{Chunk, FinalResponse};

/// Read-only observer of a chat stream.
pub trait StreamObserver: Send + Sync {
    /// Called after each chunk has been folded into the state.
    fn on_chunk(&self, _chunk: &Chunk, _state: &AccumulatedState) {}

    /// Called once, when the stream is exhausted and the response assembled.
    fn on_complete(&self, _response: &FinalResponse) {}

    /// Called once, when consumption or final assembly fails.
    fn on_error(&self, _error: &StreamError, _state: &AccumulatedState) {}
}

/// Observer that reports stream progress through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    record_content: bool,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also log the assistant text on completion.
    pub fn with_content(mut self, record: bool) -> Self {
        self.record_content = record;
        self
    }
}

impl StreamObserver for TracingObserver {
    fn on_chunk(&self, chunk: &Chunk, state: &AccumulatedState) {
        tracing::trace!(
            delta_len = chunk.content_delta.len(),
            tool_call_deltas = chunk.tool_call_deltas.len(),
            chunks = state.chunks_consumed(),
            "stream chunk"
        );
    }

    fn on_complete(&self, response: &FinalResponse) {
        tracing::info!(
            provider = %response.provider,
            model = response.model.as_deref().unwrap_or("unknown"),
            finish_reason = response.finish_reason.as_str(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            cost = response.cost,
            tool_calls = response.tool_calls().len(),
            "stream completed"
        );
        if self.record_content {
            tracing::debug!(
                content = response.content().unwrap_or_default(),
                "stream completion content"
            );
        }
    }

    fn on_error(&self, error: &StreamError, state: &AccumulatedState) {
        tracing::warn!(
            chunks = state.chunks_consumed(),
            partial_content_len = state.content().len(),
            "stream failed: {error}"
        );
    }
}
