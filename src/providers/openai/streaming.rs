//! OpenAI chunk adapter
//!
//! Normalizes chat-completions stream chunks. Content and tool-call deltas
//! come from choice 0. OpenAI sends one choice per chunk, so the finish
//! reason is taken from whichever choice reports one; with `n > 1` the
//! state ends up with one finish reason per choice.

use super::types::{OpenAiStreamChunk, OpenAiUsage};
use crate::error::StreamError;
use crate::providers::pricing::{ModelPrice, OPENAI_PRICES, cost_for};
use crate::providers::provider_error;
use crate::streaming::{ChunkAdapter, ToolCallPolicy, UsageMode};
use crate::types::{Chunk, FinishReason, ToolCallDelta, UsageDelta};

/// Map an OpenAI-family `finish_reason` string.
pub fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "tool_calls" | "function_call" => FinishReason::ToolCalls,
        "length" => FinishReason::Length,
        "content_filter" => FinishReason::ContentFilter,
        other => FinishReason::Other(other.to_string()),
    }
}

/// Build a [`Chunk`] from a decoded OpenAI-shaped chunk.
///
/// `usage` is passed separately because OpenAI-compatible providers report
/// it in different places.
pub(crate) fn normalize_chunk(
    raw: OpenAiStreamChunk,
    usage: Option<OpenAiUsage>,
    prices: &[ModelPrice],
) -> Chunk {
    let mut chunk = Chunk::new();

    chunk.finish_reason = raw
        .choices
        .iter()
        .find_map(|choice| choice.finish_reason.as_deref().filter(|r| !r.is_empty()))
        .map(map_finish_reason);

    if let Some(delta) = raw
        .choices
        .into_iter()
        .find(|choice| choice.index == 0)
        .and_then(|choice| choice.delta)
    {
        if let Some(content) = delta.content {
            chunk.content_delta = content;
        }
        for (position, call) in delta.tool_calls.unwrap_or_default().into_iter().enumerate() {
            let index = call.index.unwrap_or(position as u32);
            let mut tool_delta = ToolCallDelta::new(index);
            tool_delta.id = call.id.filter(|id| !id.is_empty());
            if let Some(function) = call.function {
                tool_delta.name = function.name;
                tool_delta.arguments = function.arguments;
            }
            chunk.tool_call_deltas.push(tool_delta);
        }
    }

    if let Some(usage) = usage {
        let delta = UsageDelta {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        };
        if !delta.is_empty() {
            chunk.usage_delta = Some(delta);
        }
        if let (Some(model), Some(input), Some(output)) = (
            raw.model.as_deref(),
            usage.prompt_tokens,
            usage.completion_tokens,
        ) {
            chunk.cost_hint = cost_for(prices, model, input, output);
        }
    }

    chunk.id = raw.id.filter(|id| !id.is_empty());
    chunk.model = raw.model.filter(|model| !model.is_empty());
    chunk
}

/// Decode a raw payload, surfacing provider error objects as transport errors.
pub(crate) fn decode<T>(provider: &'static str, raw: serde_json::Value) -> Result<T, StreamError>
where
    T: serde::de::DeserializeOwned,
{
    if let Some(error) = provider_error(&raw) {
        tracing::debug!(provider, "provider error event: {error}");
        return Err(error.into());
    }
    serde_json::from_value(raw).map_err(|e| StreamError::malformed(provider, e.to_string()))
}

/// Chunk adapter for OpenAI chat completions.
#[derive(Debug, Clone)]
pub struct OpenAiChunkAdapter {
    usage_mode: UsageMode,
    tool_call_policy: ToolCallPolicy,
}

impl OpenAiChunkAdapter {
    pub const fn new() -> Self {
        Self {
            usage_mode: UsageMode::Cumulative,
            tool_call_policy: ToolCallPolicy::Strict,
        }
    }

    pub const fn with_usage_mode(mut self, usage_mode: UsageMode) -> Self {
        self.usage_mode = usage_mode;
        self
    }

    pub const fn with_tool_call_policy(mut self, policy: ToolCallPolicy) -> Self {
        self.tool_call_policy = policy;
        self
    }
}

impl Default for OpenAiChunkAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkAdapter for OpenAiChunkAdapter {
    type Raw = serde_json::Value;

    fn provider(&self) -> &'static str {
        "openai"
    }

    fn adapt(&self, raw: serde_json::Value) -> Result<Chunk, StreamError> {
        let chunk: OpenAiStreamChunk = decode(self.provider(), raw)?;
        let usage = chunk.usage;
        Ok(normalize_chunk(chunk, usage, OPENAI_PRICES))
    }

    fn usage_mode(&self) -> UsageMode {
        self.usage_mode
    }

    fn tool_call_policy(&self) -> ToolCallPolicy {
        self.tool_call_policy
    }
}
