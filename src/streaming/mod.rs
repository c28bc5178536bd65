//! Streaming Module
//!
//! Folds provider chunk streams into a single call response.
//!
//! The pipeline has three stages:
//!
//! 1. A [`ChunkAdapter`] normalizes each raw provider chunk into a [`Chunk`].
//! 2. A [`StreamAccumulator`] folds chunks into an [`AccumulatedState`].
//! 3. A [`CallResponseBuilder`] projects the exhausted state into a
//!    [`FinalResponse`](crate::types::FinalResponse).
//!
//! [`ChatStream`] drives all three over an async transport.
//!
//! [`Chunk`]: crate::types::Chunk

mod accumulator;
mod adapter;
mod builder;
mod options;
mod sse;
mod state;
mod stream;

pub use accumulator::StreamAccumulator;
pub use adapter::{ChunkAdapter, PassthroughAdapter};
pub use builder::{CallResponseBuilder, ToolCallPolicy};
pub use options::StreamOptions;
pub use sse::{JsonSseStream, SseJsonConfig, sse_json_values};
pub use state::{AccumulatedState, ToolCallSlot, UsageMode};
pub use stream::{ChatStream, ChunkSource, accumulate};
