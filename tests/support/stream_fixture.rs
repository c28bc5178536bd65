//! Test fixtures utilities: load SSE streaming chunks and drive adapters

use chatfold::streaming::{
    ChatStream, ChunkAdapter, SseJsonConfig, StreamOptions, sse_json_values,
};
use chatfold::{Chunk, StreamError};
use futures_util::StreamExt;
use std::io;

/// Load an `.sse` fixture file and split it into SSE events (separated by blank lines), returning a byte stream
pub fn load_sse_fixture_as_bytes(path: &str) -> io::Result<Vec<Result<Vec<u8>, io::Error>>> {
    let raw = std::fs::read_to_string(path)?;
    // Normalize line endings
    let normalized = raw.replace("\r\n", "\n");
    let mut out = Vec::new();
    for chunk in normalized.split("\n\n") {
        let s = chunk.trim_end_matches('\n');
        if s.is_empty() {
            continue;
        }
        // Restore SSE event blank line terminator
        let mut owned = String::from(s);
        owned.push_str("\n\n");
        out.push(Ok(owned.into_bytes()));
    }
    Ok(out)
}

/// Build a chat stream over a fixture file.
pub fn fixture_stream<A>(path: &str, adapter: A, options: StreamOptions) -> ChatStream<A>
where
    A: ChunkAdapter<Raw = serde_json::Value>,
{
    let bytes = load_sse_fixture_as_bytes(path).expect("load fixture");
    let events = sse_json_values(
        futures_util::stream::iter(bytes),
        SseJsonConfig::new(adapter.provider()),
    );
    ChatStream::with_options(events, adapter, options)
}

/// Drain a chat stream, returning every item it yielded.
pub async fn drain<A: ChunkAdapter>(stream: &mut ChatStream<A>) -> Vec<Result<Chunk, StreamError>> {
    let mut items = Vec::new();
    while let Some(item) = stream.next().await {
        items.push(item);
    }
    items
}
