//! Retry
//!
//! Re-runs the whole connect-and-consume pipeline when a stream fails with a
//! retryable error. Every attempt gets a fresh [`ChatStream`] and therefore a
//! fresh accumulator; chunks from a failed attempt never leak into the next.
//!
//! ```rust,ignore
//! use chatfold::retry::{RetryOptions, collect_with_retry};
//!
//! let response = collect_with_retry(
//!     || async { connect().await },
//!     OpenAiChunkAdapter::new(),
//!     RetryOptions::for_provider("openai"),
//! )
//! .await?;
//! ```

use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use futures::Stream;
use std::future::Future;
use std::time::Duration;

use crate::error::StreamError;
use crate::streaming::{ChatStream, ChunkAdapter, StreamOptions};
use crate::types::FinalResponse;

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryOptions {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
    /// Give up once this much time has passed since the first attempt.
    pub max_elapsed_time: Option<Duration>,
    /// Options applied to the stream of every attempt.
    pub stream_options: StreamOptions,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_interval: Duration::from_millis(1000),
            max_interval: Duration::from_secs(60),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(300)),
            stream_options: StreamOptions::default(),
        }
    }
}

impl RetryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider-tuned defaults.
    pub fn for_provider(provider: &str) -> Self {
        match provider {
            "anthropic" => Self::default().with_multiplier(1.5),
            _ => Self::default(),
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_max_elapsed_time(mut self, elapsed: Option<Duration>) -> Self {
        self.max_elapsed_time = elapsed;
        self
    }

    pub fn with_stream_options(mut self, options: StreamOptions) -> Self {
        self.stream_options = options;
        self
    }

    /// Delay schedule for these options.
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_interval)
            .with_max_interval(self.max_interval)
            .with_multiplier(self.multiplier)
            .with_max_elapsed_time(self.max_elapsed_time)
            .build()
    }
}

/// Connect, consume and assemble, retrying retryable failures.
///
/// `connect` is called once per attempt and must open a new transport
/// stream. Errors from `connect` itself are classified the same way as
/// errors raised mid-stream.
pub async fn collect_with_retry<C, Fut, S, E, A>(
    connect: C,
    adapter: A,
    options: RetryOptions,
) -> Result<FinalResponse, StreamError>
where
    C: Fn() -> Fut,
    Fut: Future<Output = Result<S, StreamError>>,
    S: Stream<Item = Result<A::Raw, E>> + Send + 'static,
    E: Into<StreamError> + 'static,
    A: ChunkAdapter + Clone,
    A::Raw: Send + 'static,
{
    let mut backoff = options.backoff();
    backoff.reset();
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let result = match connect().await {
            Ok(source) => {
                ChatStream::with_options(source, adapter.clone(), options.stream_options.clone())
                    .collect_response()
                    .await
            }
            Err(error) => Err(error),
        };

        let error = match result {
            Ok(response) => {
                if attempt > 1 {
                    tracing::debug!(
                        provider = adapter.provider(),
                        attempt,
                        "stream succeeded after retry"
                    );
                }
                return Ok(response);
            }
            Err(error) => error,
        };

        if !error.is_retryable() || attempt >= options.max_attempts {
            return Err(error);
        }
        let Some(delay) = backoff.next_backoff() else {
            tracing::warn!(
                provider = adapter.provider(),
                attempt,
                "retry time budget exhausted: {error}"
            );
            return Err(error);
        };

        tracing::warn!(
            provider = adapter.provider(),
            attempt,
            max_attempts = options.max_attempts,
            delay_ms = delay.as_millis() as u64,
            "retrying stream: {error}"
        );
        tokio::time::sleep(delay).await;
    }
}
