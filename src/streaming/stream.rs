//! Chat Stream
//!
//! Drives one transport stream through one adapter into one accumulator.
//! Yields each normalized chunk as it is folded, so callers can render
//! partial output, and assembles the final response once the transport is
//! exhausted.

use chrono::{DateTime, Utc};
use futures::Stream;
use futures_util::StreamExt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use super::accumulator::StreamAccumulator;
use super::adapter::ChunkAdapter;
use super::builder::CallResponseBuilder;
use super::options::StreamOptions;
use super::state::AccumulatedState;
use crate::error::{StreamError, TransportError};
use crate::telemetry::StreamObserver;
use crate::types::{Chunk, FinalResponse, StreamTiming, UserMessage};
use crate::utils::cancel::CancelHandle;

/// Boxed transport stream of raw provider chunks.
pub type ChunkSource<R> = Pin<Box<dyn Stream<Item = Result<R, StreamError>> + Send>>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Streaming,
    Completed,
    Failed(String),
    Cancelled,
}

/// A provider stream being folded into a unified response.
///
/// Implements [`Stream`] yielding `Result<Chunk, StreamError>`. After the
/// first error the stream ends; the transport is not polled again.
pub struct ChatStream<A: ChunkAdapter> {
    source: ChunkSource<A::Raw>,
    adapter: A,
    accumulator: StreamAccumulator,
    builder: CallResponseBuilder,
    user_message: Option<UserMessage>,
    cancel_handle: Option<CancelHandle>,
    observers: Vec<Arc<dyn StreamObserver>>,
    phase: Phase,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

// No field is structurally pinned; the transport is already boxed.
impl<A: ChunkAdapter> Unpin for ChatStream<A> {}

impl<A> ChatStream<A>
where
    A: ChunkAdapter,
    A::Raw: Send + 'static,
{
    /// Wrap a transport stream with the adapter's default policies.
    ///
    /// The source may fail with a bare [`TransportError`] or with a
    /// [`StreamError`] already classified upstream (e.g. by
    /// [`sse_json_values`](super::sse_json_values)).
    pub fn new<S, E>(source: S, adapter: A) -> Self
    where
        S: Stream<Item = Result<A::Raw, E>> + Send + 'static,
        E: Into<StreamError> + 'static,
    {
        Self::with_options(source, adapter, StreamOptions::default())
    }

    /// Wrap a transport stream with explicit options.
    pub fn with_options<S, E>(source: S, adapter: A, options: StreamOptions) -> Self
    where
        S: Stream<Item = Result<A::Raw, E>> + Send + 'static,
        E: Into<StreamError> + 'static,
    {
        let usage_mode = options.usage_mode.unwrap_or_else(|| adapter.usage_mode());
        let policy = options
            .tool_call_policy
            .unwrap_or_else(|| adapter.tool_call_policy());
        let builder = CallResponseBuilder::new(adapter.provider()).with_tool_call_policy(policy);

        tracing::debug!(
            provider = adapter.provider(),
            ?usage_mode,
            ?policy,
            "starting chat stream"
        );

        Self {
            source: Box::pin(source.map(|item| item.map_err(Into::into))),
            accumulator: StreamAccumulator::with_usage_mode(usage_mode),
            builder,
            user_message: options.user_message,
            cancel_handle: options.cancel_handle,
            observers: Vec::new(),
            phase: Phase::Streaming,
            started_at: Utc::now(),
            finished_at: None,
            adapter,
        }
    }
}

impl<A: ChunkAdapter> ChatStream<A> {
    /// Attach a read-only observer.
    pub fn with_observer(mut self, observer: Arc<dyn StreamObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn provider(&self) -> &'static str {
        self.adapter.provider()
    }

    /// State accumulated so far.
    pub const fn state(&self) -> &AccumulatedState {
        self.accumulator.state()
    }

    /// True once the transport has been exhausted without error.
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn is_cancelled(&self) -> bool {
        self.phase == Phase::Cancelled
    }

    /// Give up the stream and keep whatever state it reached.
    pub fn into_state(self) -> AccumulatedState {
        self.accumulator.finish()
    }

    /// Assemble the final response without consuming the stream.
    ///
    /// Only available once the transport has been exhausted.
    pub fn response(&self) -> Result<FinalResponse, StreamError> {
        self.ensure_complete()?;
        let response = self.builder.build(self.accumulator.state())?;
        Ok(match self.timing() {
            Some(timing) => response.with_timing(timing),
            None => response,
        })
    }

    /// Assemble the final response, consuming the stream.
    pub fn into_response(self) -> Result<FinalResponse, StreamError> {
        self.ensure_complete()?;
        let timing = self.timing();
        let state = self.accumulator.finish();
        let response = self.builder.build(&state)?;
        Ok(match timing {
            Some(timing) => response.with_timing(timing),
            None => response,
        })
    }

    /// Yield `parser(chunk)` in place of each chunk.
    ///
    /// Chunks are folded before the parser sees them, and the stream is only
    /// borrowed, so [`ChatStream::into_response`] works afterwards.
    pub fn map_chunks<'a, T, F>(
        &'a mut self,
        mut parser: F,
    ) -> impl Stream<Item = Result<T, StreamError>> + 'a
    where
        F: FnMut(Chunk) -> T + 'a,
        T: 'a,
    {
        StreamExt::map(self, move |item| item.map(&mut parser))
    }

    /// Drain the stream and assemble the final response.
    pub async fn collect_response(mut self) -> Result<FinalResponse, StreamError> {
        while let Some(item) = self.next().await {
            item?;
        }
        self.into_response()
    }

    fn ensure_complete(&self) -> Result<(), StreamError> {
        match &self.phase {
            Phase::Completed => Ok(()),
            Phase::Streaming => Err(StreamError::incomplete("stream has not been exhausted")),
            Phase::Cancelled => Err(StreamError::incomplete("stream was cancelled")),
            Phase::Failed(reason) => Err(StreamError::incomplete(format!(
                "stream failed: {reason}"
            ))),
        }
    }

    fn timing(&self) -> Option<StreamTiming> {
        self.finished_at.map(|finished_at| StreamTiming {
            started_at: self.started_at,
            finished_at,
        })
    }

    fn fail(&mut self, error: &StreamError) {
        tracing::debug!(
            provider = self.adapter.provider(),
            chunks = self.accumulator.state().chunks_consumed(),
            "chat stream aborted: {error}"
        );
        self.phase = Phase::Failed(error.to_string());
        self.finished_at = Some(Utc::now());
        for observer in &self.observers {
            observer.on_error(error, self.accumulator.state());
        }
    }

    fn complete(&mut self) {
        self.phase = Phase::Completed;
        self.finished_at = Some(Utc::now());
        tracing::debug!(
            provider = self.adapter.provider(),
            chunks = self.accumulator.state().chunks_consumed(),
            "chat stream exhausted"
        );
        if self.observers.is_empty() {
            return;
        }
        match self.response() {
            Ok(response) => {
                for observer in &self.observers {
                    observer.on_complete(&response);
                }
            }
            Err(error) => {
                for observer in &self.observers {
                    observer.on_error(&error, self.accumulator.state());
                }
            }
        }
    }
}

impl<A: ChunkAdapter> Stream for ChatStream<A> {
    type Item = Result<Chunk, StreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.phase != Phase::Streaming {
            return Poll::Ready(None);
        }
        if this
            .cancel_handle
            .as_ref()
            .is_some_and(CancelHandle::is_cancelled)
        {
            tracing::debug!(provider = this.adapter.provider(), "chat stream cancelled");
            this.phase = Phase::Cancelled;
            return Poll::Ready(None);
        }

        match this.source.as_mut().poll_next(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(None) => {
                this.complete();
                Poll::Ready(None)
            }
            Poll::Ready(Some(Err(error))) => {
                this.fail(&error);
                Poll::Ready(Some(Err(error)))
            }
            Poll::Ready(Some(Ok(raw))) => match this.adapter.adapt(raw) {
                Ok(mut chunk) => {
                    if let Some(message) = this.user_message.take() {
                        chunk.user_message = Some(message);
                    }
                    this.accumulator.consume(&chunk);
                    for observer in &this.observers {
                        observer.on_chunk(&chunk, this.accumulator.state());
                    }
                    Poll::Ready(Some(Ok(chunk)))
                }
                Err(error) => {
                    this.fail(&error);
                    Poll::Ready(Some(Err(error)))
                }
            },
        }
    }
}

/// Fold a synchronous chunk sequence and assemble its response.
///
/// Stops at the first error; use [`StreamAccumulator`] directly when the
/// partial state of a failed sequence is needed.
pub fn accumulate<A, I>(adapter: &A, chunks: I) -> Result<FinalResponse, StreamError>
where
    A: ChunkAdapter,
    I: IntoIterator<Item = Result<A::Raw, TransportError>>,
{
    let mut accumulator = StreamAccumulator::with_usage_mode(adapter.usage_mode());
    for raw in chunks {
        let chunk = adapter.adapt(raw?)?;
        accumulator.consume(&chunk);
    }
    CallResponseBuilder::new(adapter.provider())
        .with_tool_call_policy(adapter.tool_call_policy())
        .build(&accumulator.finish())
}
