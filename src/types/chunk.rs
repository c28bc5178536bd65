//! Normalized chunk types shared by every provider adapter.

use serde::{Deserialize, Serialize};

use super::message::UserMessage;

/// Why the model stopped generating.
///
/// Maps to:
/// - OpenAI/Groq: `stop`, `tool_calls`, `length`, `content_filter`
/// - Anthropic: `end_turn`/`stop_sequence`, `tool_use`, `max_tokens`, `refusal`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Completed naturally or hit a stop sequence.
    Stop,
    /// The model asked for one or more tool calls.
    ToolCalls,
    /// The response was cut off by the token limit.
    Length,
    /// The output was blocked by a safety filter or refused.
    ContentFilter,
    /// A provider-specific reason, kept verbatim.
    Other(String),
}

impl FinishReason {
    /// Wire label used by OpenAI-compatible APIs and telemetry.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Stop => "stop",
            Self::ToolCalls => "tool_calls",
            Self::Length => "length",
            Self::ContentFilter => "content_filter",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

/// Partial update to one tool-call slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallDelta {
    /// Provider-assigned slot index.
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name fragment to append.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// JSON arguments fragment to append. Never parsed while streaming.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

impl ToolCallDelta {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = Some(arguments.into());
        self
    }
}

/// Token counts reported by a chunk. Either side may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
}

impl UsageDelta {
    pub const fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens: Some(input_tokens),
            output_tokens: Some(output_tokens),
        }
    }

    pub const fn input(input_tokens: u64) -> Self {
        Self {
            input_tokens: Some(input_tokens),
            output_tokens: None,
        }
    }

    pub const fn output(output_tokens: u64) -> Self {
        Self {
            input_tokens: None,
            output_tokens: Some(output_tokens),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.input_tokens.is_none() && self.output_tokens.is_none()
    }
}

/// One normalized step of a streamed response.
///
/// Built by a [`ChunkAdapter`](crate::streaming::ChunkAdapter) from one raw
/// provider event. Adapters never fill `user_message`; that context comes
/// from the calling layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text to append (possibly empty).
    #[serde(default)]
    pub content_delta: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_call_deltas: Vec<ToolCallDelta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_delta: Option<UsageDelta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_hint: Option<f64>,
    /// Provider response id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Model that produced the chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_message: Option<UserMessage>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// A chunk carrying only text.
    pub fn content(delta: impl Into<String>) -> Self {
        Self {
            content_delta: delta.into(),
            ..Default::default()
        }
    }

    pub fn with_content(mut self, delta: impl Into<String>) -> Self {
        self.content_delta = delta.into();
        self
    }

    pub fn with_tool_call(mut self, delta: ToolCallDelta) -> Self {
        self.tool_call_deltas.push(delta);
        self
    }

    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = Some(reason);
        self
    }

    pub fn with_usage(mut self, usage: UsageDelta) -> Self {
        self.usage_delta = Some(usage);
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost_hint = Some(cost);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_user_message(mut self, message: UserMessage) -> Self {
        self.user_message = Some(message);
        self
    }

    /// True when the chunk carries nothing to fold (keep-alives, block stops).
    pub fn is_empty(&self) -> bool {
        self.content_delta.is_empty()
            && self.tool_call_deltas.is_empty()
            && self.finish_reason.is_none()
            && self.usage_delta.is_none()
            && self.cost_hint.is_none()
            && self.id.is_none()
            && self.model.is_none()
            && self.user_message.is_none()
    }
}
