//! Error types for stream consumption and final assembly.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Coarse classification used by retry and presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The provider sent something that does not match its wire contract.
    Parsing,
    /// The connection failed, timed out or returned a transport-level status.
    Network,
    /// The provider reported an error inside an otherwise healthy stream.
    Provider,
    /// The caller asked for something the stream cannot give in its current state.
    State,
}

/// Kind of transport failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The connection dropped before the stream ended.
    Disconnected,
    /// The transport gave up waiting for the next chunk.
    Timeout,
    /// The provider answered with a non-success HTTP status.
    Http { status: u16 },
    /// The provider emitted an error event mid-stream.
    Provider,
    /// The SSE framing could not be decoded.
    Sse,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => f.write_str("connection dropped"),
            Self::Timeout => f.write_str("timed out"),
            Self::Http { status } => write!(f, "HTTP {status}"),
            Self::Provider => f.write_str("provider error"),
            Self::Sse => f.write_str("SSE decoding failed"),
        }
    }
}

/// A failure while retrieving chunks from the provider.
///
/// Produced by the transport collaborator (or by an adapter that finds a
/// provider error event in the stream) and carried through
/// [`StreamError::Transport`] without modification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn disconnected(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Disconnected, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Http { status }, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Provider, message)
    }

    pub fn sse(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Sse, message)
    }

    /// HTTP status, when the failure carried one.
    pub const fn status_code(&self) -> Option<u16> {
        match self.kind {
            TransportErrorKind::Http { status } => Some(status),
            _ => None,
        }
    }

    /// Whether re-running the whole request has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match &self.kind {
            TransportErrorKind::Disconnected | TransportErrorKind::Timeout => true,
            TransportErrorKind::Http { status } => {
                matches!(status, 408 | 429) || (500..=599).contains(status)
            }
            TransportErrorKind::Provider => {
                let msg = self.message.to_ascii_lowercase();
                msg.contains("overloaded") || msg.contains("rate_limit") || msg.contains("rate limit")
            }
            TransportErrorKind::Sse => false,
        }
    }
}

/// One tool-call slot whose buffered arguments are not valid JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("tool call #{index} ({name}) has invalid JSON arguments: {message}")]
pub struct ToolCallArgumentsError {
    /// Provider-assigned slot index.
    pub index: u32,
    pub id: Option<String>,
    pub name: String,
    /// The arguments buffer exactly as accumulated.
    pub raw_arguments: String,
    /// Parser diagnostic.
    pub message: String,
}

/// Errors surfaced while consuming a stream or assembling its response.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamError {
    /// A raw chunk violated its provider's shape contract.
    #[error("malformed {provider} chunk: {message}")]
    MalformedChunk { provider: String, message: String },

    /// Buffered tool-call arguments failed to parse at build time.
    #[error(transparent)]
    ToolCallArguments(#[from] ToolCallArgumentsError),

    /// Final assembly was requested before any chunk was consumed.
    #[error("cannot build a response from a stream that yielded no chunks")]
    EmptyStream,

    /// Chunk retrieval failed; the transport error is carried as-is.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Final assembly was requested on a stream that did not run to completion.
    #[error("stream is incomplete: {reason}")]
    Incomplete { reason: String },
}

impl StreamError {
    pub fn malformed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedChunk {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn incomplete(reason: impl Into<String>) -> Self {
        Self::Incomplete {
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedChunk { .. } | Self::ToolCallArguments(_) => ErrorCategory::Parsing,
            Self::Transport(err) => match err.kind {
                TransportErrorKind::Provider => ErrorCategory::Provider,
                TransportErrorKind::Sse => ErrorCategory::Parsing,
                _ => ErrorCategory::Network,
            },
            Self::EmptyStream | Self::Incomplete { .. } => ErrorCategory::State,
        }
    }

    /// Only transport failures are worth re-running the request for.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// The transport error, if this is one.
    pub const fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_display_transparently() {
        let transport = TransportError::http(502, "bad gateway");
        let err = StreamError::from(transport.clone());
        assert_eq!(err.to_string(), transport.to_string());
        assert_eq!(err.to_string(), "HTTP 502: bad gateway");
        assert_eq!(err.as_transport(), Some(&transport));
    }

    #[test]
    fn retryable_classification() {
        assert!(StreamError::from(TransportError::disconnected("eof")).is_retryable());
        assert!(StreamError::from(TransportError::timeout("idle")).is_retryable());
        assert!(StreamError::from(TransportError::http(429, "slow down")).is_retryable());
        assert!(StreamError::from(TransportError::http(503, "unavailable")).is_retryable());
        assert!(!StreamError::from(TransportError::http(400, "bad request")).is_retryable());
        assert!(StreamError::from(TransportError::provider("overloaded_error: busy")).is_retryable());
        assert!(!StreamError::from(TransportError::provider("invalid_request_error")).is_retryable());
        assert!(!StreamError::malformed("openai", "missing choices").is_retryable());
        assert!(!StreamError::EmptyStream.is_retryable());
    }

    #[test]
    fn categories() {
        assert_eq!(
            StreamError::malformed("groq", "x").category(),
            ErrorCategory::Parsing
        );
        assert_eq!(
            StreamError::from(TransportError::provider("x")).category(),
            ErrorCategory::Provider
        );
        assert_eq!(
            StreamError::from(TransportError::timeout("x")).category(),
            ErrorCategory::Network
        );
        assert_eq!(StreamError::EmptyStream.category(), ErrorCategory::State);
        assert_eq!(
            StreamError::incomplete("cancelled").category(),
            ErrorCategory::State
        );
    }
}
