//! # chatfold - Streamed LLM Response Accumulation
//!
//! chatfold folds provider-specific chat completion streams (OpenAI,
//! Anthropic, Groq) into one unified, incrementally inspectable state and,
//! once the stream is exhausted, into a response shaped like a
//! non-streaming call result.
//!
//! ## Features
//!
//! - **Provider adapters**: one [`ChunkAdapter`](streaming::ChunkAdapter) per
//!   provider family normalizes raw chunks; the accumulator never branches on
//!   provider identity.
//! - **Live state**: the accumulated text, tool calls and usage can be read
//!   after every chunk.
//! - **Two-phase tool calls**: argument fragments are buffered verbatim and
//!   parsed once, at final assembly, under a per-provider policy.
//! - **Library first**: no HTTP client, no subscriber installation; bring
//!   your own transport and tracing setup.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chatfold::prelude::*;
//!
//! let events = sse_json_values(response.bytes_stream(), SseJsonConfig::new("openai"));
//! let mut stream = ChatStream::with_options(
//!     events,
//!     OpenAiChunkAdapter::new(),
//!     StreamOptions::new().with_user_message(UserMessage::text("Hello!")),
//! );
//!
//! while let Some(chunk) = stream.next().await {
//!     print!("{}", chunk?.content_delta);
//! }
//! let response = stream.into_response()?;
//! println!("\n{} tokens", response.total_tokens().unwrap_or_default());
//! ```

#![deny(unsafe_code)]

pub mod error;
pub mod providers;
pub mod retry;
pub mod streaming;
pub mod telemetry;
pub mod types;
pub mod utils;

pub use error::{
    ErrorCategory, StreamError, ToolCallArgumentsError, TransportError, TransportErrorKind,
};
pub use streaming::{
    AccumulatedState, CallResponseBuilder, ChatStream, ChunkAdapter, StreamAccumulator,
    StreamOptions,
};
pub use types::{Chunk, FinalResponse, FinishReason};

/// Provider adapters enabled at compile time.
pub fn enabled_providers() -> Vec<&'static str> {
    let mut providers = Vec::new();
    #[cfg(feature = "openai")]
    providers.push("openai");
    #[cfg(feature = "anthropic")]
    providers.push("anthropic");
    #[cfg(feature = "groq")]
    providers.push("groq");
    providers
}

/// Commonly used types and traits.
pub mod prelude {
    pub use crate::error::{StreamError, TransportError, TransportErrorKind};
    pub use crate::retry::{RetryOptions, collect_with_retry};
    pub use crate::streaming::{
        AccumulatedState, CallResponseBuilder, ChatStream, ChunkAdapter, PassthroughAdapter,
        SseJsonConfig, StreamAccumulator, StreamOptions, ToolCallPolicy, UsageMode,
        sse_json_values,
    };
    pub use crate::telemetry::{StreamObserver, TracingObserver};
    pub use crate::types::*;
    pub use crate::utils::CancelHandle;

    #[cfg(feature = "anthropic")]
    pub use crate::providers::anthropic::AnthropicChunkAdapter;
    #[cfg(feature = "groq")]
    pub use crate::providers::groq::GroqChunkAdapter;
    #[cfg(feature = "openai")]
    pub use crate::providers::openai::OpenAiChunkAdapter;

    pub use futures_util::StreamExt;
}
