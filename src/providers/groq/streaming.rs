//! `Groq` chunk adapter
//!
//! Groq speaks the OpenAI chunk shape but reports usage under
//! `x_groq.usage` on the final chunk.

use serde::Deserialize;

use crate::error::StreamError;
use crate::providers::openai::types::{OpenAiStreamChunk, OpenAiUsage};
use crate::providers::openai::{decode, normalize_chunk};
use crate::providers::pricing::GROQ_PRICES;
use crate::streaming::{ChunkAdapter, ToolCallPolicy, UsageMode};
use crate::types::Chunk;

#[derive(Debug, Clone, Deserialize)]
struct GroqStreamChunk {
    #[serde(flatten)]
    base: OpenAiStreamChunk,
    #[serde(default)]
    x_groq: Option<GroqExtension>,
}

#[derive(Debug, Clone, Deserialize)]
struct GroqExtension {
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

/// Chunk adapter for Groq chat completions.
///
/// Defaults to [`ToolCallPolicy::Partial`]: valid tool calls are returned
/// even when a sibling call's arguments do not parse.
#[derive(Debug, Clone)]
pub struct GroqChunkAdapter {
    usage_mode: UsageMode,
    tool_call_policy: ToolCallPolicy,
}

impl GroqChunkAdapter {
    pub const fn new() -> Self {
        Self {
            usage_mode: UsageMode::Cumulative,
            tool_call_policy: ToolCallPolicy::Partial,
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

impl Default for GroqChunkAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkAdapter for GroqChunkAdapter {
    type Raw = serde_json::Value;

    fn provider(&self) -> &'static str {
        "groq"
    }

    fn adapt(&self, raw: serde_json::Value) -> Result<Chunk, StreamError> {
        let chunk: GroqStreamChunk = decode(self.provider(), raw)?;
        let usage = chunk
            .x_groq
            .and_then(|ext| ext.usage)
            .or(chunk.base.usage);
        Ok(normalize_chunk(chunk.base, usage, GROQ_PRICES))
    }

    fn usage_mode(&self) -> UsageMode {
        self.usage_mode
    }

    fn tool_call_policy(&self) -> ToolCallPolicy {
        self.tool_call_policy
    }
}
