//! Accumulated stream state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{FinishReason, UserMessage};

/// How usage reports from successive chunks are folded together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageMode {
    /// Each report is a running total: the latest value replaces the previous one.
    #[default]
    Cumulative,
    /// Each report counts only new tokens: values are added up.
    Incremental,
}

/// Buffer for one in-progress tool call.
///
/// `name` and `arguments_buffer` only ever grow by append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCallSlot {
    /// Provider-assigned slot index.
    pub index: u32,
    pub id: Option<String>,
    pub name: String,
    /// Raw JSON fragments, concatenated. Parsed only at final assembly.
    pub arguments_buffer: String,
}

impl ToolCallSlot {
    pub(crate) const fn new(index: u32) -> Self {
        Self {
            index,
            id: None,
            name: String::new(),
            arguments_buffer: String::new(),
        }
    }
}

/// Running state of a stream, owned by its accumulator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccumulatedState {
    pub(crate) content: String,
    /// Slots in first-seen order.
    pub(crate) tool_call_slots: Vec<ToolCallSlot>,
    #[serde(skip)]
    pub(crate) slot_positions: HashMap<u32, usize>,
    pub(crate) finish_reasons: Vec<FinishReason>,
    pub(crate) cost: Option<f64>,
    pub(crate) input_tokens: Option<u64>,
    pub(crate) output_tokens: Option<u64>,
    pub(crate) user_message: Option<UserMessage>,
    pub(crate) id: Option<String>,
    pub(crate) model: Option<String>,
    pub(crate) chunks_consumed: usize,
}

impl AccumulatedState {
    /// Text accumulated so far.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Tool-call slots in first-seen index order.
    pub fn tool_call_slots(&self) -> &[ToolCallSlot] {
        &self.tool_call_slots
    }

    /// Slot for a provider index, if that index has been seen.
    pub fn tool_call_slot(&self, index: u32) -> Option<&ToolCallSlot> {
        self.slot_positions
            .get(&index)
            .map(|&pos| &self.tool_call_slots[pos])
    }

    pub fn finish_reasons(&self) -> &[FinishReason] {
        &self.finish_reasons
    }

    pub const fn cost(&self) -> Option<f64> {
        self.cost
    }

    pub const fn input_tokens(&self) -> Option<u64> {
        self.input_tokens
    }

    pub const fn output_tokens(&self) -> Option<u64> {
        self.output_tokens
    }

    pub const fn user_message(&self) -> Option<&UserMessage> {
        self.user_message.as_ref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Number of chunks folded into this state.
    pub const fn chunks_consumed(&self) -> usize {
        self.chunks_consumed
    }

    pub const fn is_empty(&self) -> bool {
        self.chunks_consumed == 0
    }
}
