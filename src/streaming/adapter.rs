//! Chunk adapters: per-provider normalization of raw chunks.

use super::builder::ToolCallPolicy;
use super::state::UsageMode;
use crate::error::StreamError;
use crate::types::Chunk;

/// Normalizes one raw provider chunk into a [`Chunk`].
///
/// Implementations are pure and stateless: no I/O, no memory of earlier
/// chunks. Anything that cannot be derived from the chunk alone (such as a
/// cost that needs token counts from two different events) is left absent.
pub trait ChunkAdapter: Send + Sync {
    /// Raw chunk type produced by the transport.
    type Raw;

    /// Provider label, used in errors, logs and the final response.
    fn provider(&self) -> &'static str;

    /// Normalize one raw chunk. A shape violation is a
    /// [`StreamError::MalformedChunk`]; a provider error event is a
    /// [`StreamError::Transport`].
    fn adapt(&self, raw: Self::Raw) -> Result<Chunk, StreamError>;

    /// How this provider's usage reports should be folded.
    fn usage_mode(&self) -> UsageMode {
        UsageMode::Cumulative
    }

    /// What final assembly does with unparseable tool-call arguments.
    fn tool_call_policy(&self) -> ToolCallPolicy {
        ToolCallPolicy::Strict
    }
}

/// Adapter for transports that already yield normalized chunks.
#[derive(Debug, Clone)]
pub struct PassthroughAdapter {
    provider: &'static str,
    usage_mode: UsageMode,
    tool_call_policy: ToolCallPolicy,
}

impl PassthroughAdapter {
    pub const fn new(provider: &'static str) -> Self {
        Self {
            provider,
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

impl Default for PassthroughAdapter {
    fn default() -> Self {
        Self::new("passthrough")
    }
}

impl ChunkAdapter for PassthroughAdapter {
    type Raw = Chunk;

    fn provider(&self) -> &'static str {
        self.provider
    }

    fn adapt(&self, raw: Chunk) -> Result<Chunk, StreamError> {
        Ok(raw)
    }

    fn usage_mode(&self) -> UsageMode {
        self.usage_mode
    }

    fn tool_call_policy(&self) -> ToolCallPolicy {
        self.tool_call_policy
    }
}
