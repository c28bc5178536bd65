//! Stream Accumulator
//!
//! Folds normalized chunks into [`AccumulatedState`]. The fold never looks at
//! which provider produced a chunk; provider differences are absorbed by the
//! [`ChunkAdapter`](super::ChunkAdapter) before a chunk gets here.

use super::state::{AccumulatedState, ToolCallSlot, UsageMode};
use crate::types::{Chunk, ToolCallDelta, UsageDelta};

/// Single-pass, forward-only fold over a chunk sequence.
///
/// The state can be inspected after every [`consume`](Self::consume) call.
/// [`finish`](Self::finish) consumes the accumulator and hands back the
/// frozen state.
#[derive(Debug, Clone, Default)]
pub struct StreamAccumulator {
    state: AccumulatedState,
    usage_mode: UsageMode,
}

impl StreamAccumulator {
    /// Create an accumulator with cumulative usage folding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator with an explicit usage folding mode.
    pub fn with_usage_mode(usage_mode: UsageMode) -> Self {
        Self {
            state: AccumulatedState::default(),
            usage_mode,
        }
    }

    pub const fn usage_mode(&self) -> UsageMode {
        self.usage_mode
    }

    /// Fold one chunk into the state.
    pub fn consume(&mut self, chunk: &Chunk) {
        let state = &mut self.state;

        if !chunk.content_delta.is_empty() {
            state.content.push_str(&chunk.content_delta);
        }

        for delta in &chunk.tool_call_deltas {
            Self::apply_tool_call_delta(state, delta);
        }

        if let Some(reason) = &chunk.finish_reason {
            state.finish_reasons.push(reason.clone());
        }

        if let Some(usage) = chunk.usage_delta {
            Self::apply_usage(state, usage, self.usage_mode);
        }

        if let Some(cost) = chunk.cost_hint {
            state.cost = Some(cost);
        }

        if state.user_message.is_none() {
            if let Some(message) = &chunk.user_message {
                state.user_message = Some(message.clone());
            }
        }

        if state.id.is_none() {
            state.id = chunk.id.clone().filter(|id| !id.is_empty());
        }
        if state.model.is_none() {
            state.model = chunk.model.clone().filter(|model| !model.is_empty());
        }

        state.chunks_consumed += 1;

        tracing::trace!(
            chunk = state.chunks_consumed,
            content_len = state.content.len(),
            tool_calls = state.tool_call_slots.len(),
            "consumed stream chunk"
        );
    }

    fn apply_tool_call_delta(state: &mut AccumulatedState, delta: &ToolCallDelta) {
        let position = match state.slot_positions.get(&delta.index) {
            Some(&pos) => pos,
            None => {
                let pos = state.tool_call_slots.len();
                state.tool_call_slots.push(ToolCallSlot::new(delta.index));
                state.slot_positions.insert(delta.index, pos);
                tracing::debug!(index = delta.index, "opened tool call slot");
                pos
            }
        };
        let slot = &mut state.tool_call_slots[position];

        // First id wins.
        if slot.id.is_none() {
            if let Some(id) = delta.id.as_ref().filter(|id| !id.is_empty()) {
                slot.id = Some(id.clone());
            }
        }
        if let Some(name) = &delta.name {
            slot.name.push_str(name);
        }
        if let Some(arguments) = &delta.arguments {
            slot.arguments_buffer.push_str(arguments);
        }
    }

    fn apply_usage(state: &mut AccumulatedState, usage: UsageDelta, mode: UsageMode) {
        match mode {
            UsageMode::Cumulative => {
                if usage.input_tokens.is_some() {
                    state.input_tokens = usage.input_tokens;
                }
                if usage.output_tokens.is_some() {
                    state.output_tokens = usage.output_tokens;
                }
            }
            UsageMode::Incremental => {
                if let Some(input) = usage.input_tokens {
                    state.input_tokens =
                        Some(state.input_tokens.unwrap_or(0).saturating_add(input));
                }
                if let Some(output) = usage.output_tokens {
                    state.output_tokens =
                        Some(state.output_tokens.unwrap_or(0).saturating_add(output));
                }
            }
        }
    }

    /// Current (possibly partial) state.
    pub const fn state(&self) -> &AccumulatedState {
        &self.state
    }

    /// Freeze the state once the chunk sequence is exhausted.
    pub fn finish(self) -> AccumulatedState {
        tracing::debug!(
            chunks = self.state.chunks_consumed,
            tool_calls = self.state.tool_call_slots.len(),
            "stream accumulation finished"
        );
        self.state
    }
}
