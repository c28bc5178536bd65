//! The assembled, non-streaming-shaped call response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chunk::FinishReason;
use super::message::{AssistantMessage, ToolCall, UserMessage};
use crate::error::ToolCallArgumentsError;

/// Wall-clock bounds of a consumed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamTiming {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl StreamTiming {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Complete response assembled after a stream is exhausted.
///
/// Shaped like the response of a non-streaming call, so downstream
/// consumers do not need to know the call was streamed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalResponse {
    /// Adapter that normalized the stream (`openai`, `anthropic`, ...).
    pub provider: String,
    pub id: Option<String>,
    pub model: Option<String>,
    pub message: AssistantMessage,
    /// First reported finish reason, or `stop` when none was reported.
    pub finish_reason: FinishReason,
    /// Every reported finish reason, one per provider choice.
    pub finish_reasons: Vec<FinishReason>,
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
    pub cost: Option<f64>,
    pub user_message: Option<UserMessage>,
    /// Tool calls whose arguments failed to parse (partial policy only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_tool_calls: Vec<ToolCallArgumentsError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<StreamTiming>,
}

impl FinalResponse {
    /// Text content of the assistant turn.
    pub fn content(&self) -> Option<&str> {
        self.message.content.as_deref()
    }

    pub fn tool_calls(&self) -> &[ToolCall] {
        &self.message.tool_calls
    }

    pub fn total_tokens(&self) -> Option<u64> {
        match (self.input_tokens, self.output_tokens) {
            (None, None) => None,
            (input, output) => Some(input.unwrap_or(0) + output.unwrap_or(0)),
        }
    }

    pub fn with_timing(mut self, timing: StreamTiming) -> Self {
        self.timing = Some(timing);
        self
    }
}
