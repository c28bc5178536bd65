//! Type Conversions for StreamError
//!
//! This module contains From trait implementations for converting
//! decoding errors into the transport taxonomy.

use super::types::{StreamError, TransportError};
use eventsource_stream::EventStreamError;
use std::fmt::Display;

impl<E: Display> From<EventStreamError<E>> for TransportError {
    fn from(err: EventStreamError<E>) -> Self {
        match err {
            // The underlying byte stream failed: the transport itself is gone.
            EventStreamError::Transport(inner) => Self::disconnected(inner.to_string()),
            other => Self::sse(other.to_string()),
        }
    }
}

impl<E: Display> From<EventStreamError<E>> for StreamError {
    fn from(err: EventStreamError<E>) -> Self {
        Self::Transport(err.into())
    }
}
