//! `Groq` Provider
//!
//! Groq exposes an OpenAI-compatible streaming API; the adapter reuses the
//! OpenAI wire types.

mod streaming;

pub use streaming::GroqChunkAdapter;
