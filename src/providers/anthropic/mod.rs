//! Anthropic Provider
//!
//! Chunk adapter for the Messages API event stream.

mod streaming;

pub use streaming::{AnthropicChunkAdapter, map_stop_reason};
