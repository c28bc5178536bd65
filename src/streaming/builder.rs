//! Call Response Builder
//!
//! Final assembly: projects an exhausted [`AccumulatedState`] into a
//! [`FinalResponse`] shaped like a non-streaming call result. Tool-call
//! arguments are parsed here and only here.

use serde::{Deserialize, Serialize};

use super::state::{AccumulatedState, ToolCallSlot};
use crate::error::{StreamError, ToolCallArgumentsError};
use crate::types::{AssistantMessage, FinalResponse, FinishReason, ToolCall};

/// What to do when a tool call's buffered arguments are not valid JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallPolicy {
    /// Fail the whole build on the first invalid slot.
    #[default]
    Strict,
    /// Keep the valid tool calls and report invalid ones alongside.
    Partial,
}

/// Assembles a [`FinalResponse`] from accumulated state.
#[derive(Debug, Clone)]
pub struct CallResponseBuilder {
    provider: String,
    tool_call_policy: ToolCallPolicy,
}

impl CallResponseBuilder {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            tool_call_policy: ToolCallPolicy::default(),
        }
    }

    pub fn with_tool_call_policy(mut self, policy: ToolCallPolicy) -> Self {
        self.tool_call_policy = policy;
        self
    }

    pub const fn tool_call_policy(&self) -> ToolCallPolicy {
        self.tool_call_policy
    }

    /// Build the response. Pure: calling it twice on the same state yields equal results.
    pub fn build(&self, state: &AccumulatedState) -> Result<FinalResponse, StreamError> {
        if state.is_empty() {
            return Err(StreamError::EmptyStream);
        }

        let mut tool_calls = Vec::with_capacity(state.tool_call_slots.len());
        let mut invalid_tool_calls = Vec::new();
        for slot in &state.tool_call_slots {
            match materialize(slot) {
                Ok(call) => tool_calls.push(call),
                Err(err) => match self.tool_call_policy {
                    ToolCallPolicy::Strict => return Err(err.into()),
                    ToolCallPolicy::Partial => {
                        tracing::warn!(
                            provider = %self.provider,
                            index = err.index,
                            name = %err.name,
                            "dropping tool call with invalid arguments: {}",
                            err.message
                        );
                        invalid_tool_calls.push(err);
                    }
                },
            }
        }

        let content = if state.content.is_empty() && state.tool_call_slots.is_empty() {
            None
        } else {
            Some(state.content.clone())
        };

        let finish_reason = state
            .finish_reasons
            .first()
            .cloned()
            .unwrap_or(FinishReason::Stop);

        tracing::debug!(
            provider = %self.provider,
            finish_reason = finish_reason.as_str(),
            tool_calls = tool_calls.len(),
            invalid_tool_calls = invalid_tool_calls.len(),
            "assembled final response"
        );

        Ok(FinalResponse {
            provider: self.provider.clone(),
            id: state.id.clone(),
            model: state.model.clone(),
            message: AssistantMessage::new(content, tool_calls),
            finish_reason,
            finish_reasons: state.finish_reasons.clone(),
            input_tokens: state.input_tokens,
            output_tokens: state.output_tokens,
            cost: state.cost,
            user_message: state.user_message.clone(),
            invalid_tool_calls,
            timing: None,
        })
    }
}

/// Parse one slot. An empty buffer means the tool takes no arguments.
fn materialize(slot: &ToolCallSlot) -> Result<ToolCall, ToolCallArgumentsError> {
    let raw = slot.arguments_buffer.trim();
    let arguments = if raw.is_empty() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_str(raw).map_err(|e| ToolCallArgumentsError {
            index: slot.index,
            id: slot.id.clone(),
            name: slot.name.clone(),
            raw_arguments: slot.arguments_buffer.clone(),
            message: e.to_string(),
        })?
    };

    Ok(ToolCall {
        id: slot.id.clone(),
        name: slot.name.clone(),
        arguments,
    })
}
