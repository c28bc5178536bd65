//! OpenAI Provider
//!
//! Chunk adapter for the chat-completions streaming API.

mod streaming;
pub mod types;

pub use streaming::{OpenAiChunkAdapter, map_finish_reason};
pub(crate) use streaming::{decode, normalize_chunk};
