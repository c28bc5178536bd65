//! Anthropic chunk adapter
//!
//! Normalizes Messages API stream events. Each SSE event maps to exactly one
//! [`Chunk`]; events that carry nothing foldable (`ping`, block stops,
//! thinking deltas) become empty chunks.

use serde::Deserialize;

use crate::error::StreamError;
use crate::providers::provider_error;
use crate::streaming::{ChunkAdapter, ToolCallPolicy, UsageMode};
use crate::types::{Chunk, FinishReason, ToolCallDelta, UsageDelta};

const PROVIDER: &str = "anthropic";

/// Anthropic stream event structure
#[derive(Debug, Clone, Deserialize)]
struct AnthropicStreamEvent {
    r#type: String,
    #[serde(default)]
    message: Option<AnthropicMessage>,
    #[serde(default)]
    index: Option<u32>,
    #[serde(default)]
    content_block: Option<AnthropicContentBlock>,
    #[serde(default)]
    delta: Option<AnthropicDelta>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Clone, Deserialize)]
struct AnthropicMessage {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

/// Content block opened by `content_block_start`.
#[derive(Debug, Clone, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Supports text_delta, input_json_delta and message-level deltas.
#[derive(Debug, Clone, Deserialize)]
struct AnthropicDelta {
    #[serde(rename = "type", default)]
    delta_type: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    partial_json: Option<String>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: Option<u64>,
    #[serde(default)]
    output_tokens: Option<u64>,
}

impl From<AnthropicUsage> for UsageDelta {
    fn from(usage: AnthropicUsage) -> Self {
        Self {
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
        }
    }
}

/// Map an Anthropic `stop_reason`.
pub fn map_stop_reason(reason: &str) -> FinishReason {
    match reason {
        "end_turn" | "stop_sequence" => FinishReason::Stop,
        "max_tokens" => FinishReason::Length,
        "tool_use" => FinishReason::ToolCalls,
        "refusal" => FinishReason::ContentFilter,
        other => FinishReason::Other(other.to_string()),
    }
}

fn malformed(message: impl Into<String>) -> StreamError {
    StreamError::malformed(PROVIDER, message)
}

/// Chunk adapter for the Anthropic Messages API.
///
/// Token counts arrive split across `message_start` (input) and
/// `message_delta` (output), so no single event can price the call and
/// `cost_hint` is never set.
#[derive(Debug, Clone)]
pub struct AnthropicChunkAdapter {
    usage_mode: UsageMode,
    tool_call_policy: ToolCallPolicy,
}

impl AnthropicChunkAdapter {
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

    fn convert_event(&self, event: AnthropicStreamEvent) -> Result<Chunk, StreamError> {
        match event.r#type.as_str() {
            "message_start" => {
                let message = event
                    .message
                    .ok_or_else(|| malformed("message_start without message"))?;
                let mut chunk = Chunk::new();
                chunk.id = message.id.filter(|id| !id.is_empty());
                chunk.model = message.model.filter(|model| !model.is_empty());
                chunk.usage_delta = message
                    .usage
                    .map(UsageDelta::from)
                    .filter(|usage| !usage.is_empty());
                Ok(chunk)
            }
            "content_block_start" => {
                let index = event
                    .index
                    .ok_or_else(|| malformed("content_block_start without index"))?;
                let block = event
                    .content_block
                    .ok_or_else(|| malformed("content_block_start without content_block"))?;
                match block.block_type.as_str() {
                    "text" => Ok(Chunk::content(block.text.unwrap_or_default())),
                    "tool_use" => {
                        let mut delta = ToolCallDelta::new(index);
                        delta.id = block.id;
                        delta.name = block.name;
                        Ok(Chunk::new().with_tool_call(delta))
                    }
                    other => {
                        tracing::trace!(block_type = other, "ignoring content block");
                        Ok(Chunk::new())
                    }
                }
            }
            "content_block_delta" => {
                let delta = event
                    .delta
                    .ok_or_else(|| malformed("content_block_delta without delta"))?;
                match delta.delta_type.as_deref() {
                    Some("text_delta") => Ok(Chunk::content(delta.text.unwrap_or_default())),
                    Some("input_json_delta") => {
                        let index = event
                            .index
                            .ok_or_else(|| malformed("input_json_delta without index"))?;
                        let mut tool_delta = ToolCallDelta::new(index);
                        tool_delta.arguments = delta.partial_json;
                        Ok(Chunk::new().with_tool_call(tool_delta))
                    }
                    other => {
                        tracing::trace!(delta_type = ?other, "ignoring content block delta");
                        Ok(Chunk::new())
                    }
                }
            }
            "message_delta" => {
                let mut chunk = Chunk::new();
                chunk.finish_reason = event
                    .delta
                    .and_then(|delta| delta.stop_reason)
                    .map(|reason| map_stop_reason(&reason));
                chunk.usage_delta = event
                    .usage
                    .map(UsageDelta::from)
                    .filter(|usage| !usage.is_empty());
                Ok(chunk)
            }
            "ping" | "content_block_stop" | "message_stop" => Ok(Chunk::new()),
            other => Err(malformed(format!("unknown event type `{other}`"))),
        }
    }
}

impl Default for AnthropicChunkAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkAdapter for AnthropicChunkAdapter {
    type Raw = serde_json::Value;

    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn adapt(&self, raw: serde_json::Value) -> Result<Chunk, StreamError> {
        if let Some(error) = provider_error(&raw) {
            tracing::debug!(provider = PROVIDER, "provider error event: {error}");
            return Err(error.into());
        }
        let event: AnthropicStreamEvent =
            serde_json::from_value(raw).map_err(|e| malformed(e.to_string()))?;
        self.convert_event(event)
    }

    fn usage_mode(&self) -> UsageMode {
        self.usage_mode
    }

    fn tool_call_policy(&self) -> ToolCallPolicy {
        self.tool_call_policy
    }
}
