//! Error Handling Module
//!
//! This module provides the error types surfaced while consuming a stream:
//! - Core error types (`StreamError`, `TransportError`, `ErrorCategory`)
//! - Type conversions from SSE decoding errors
//!
//! # Example
//!
//! ```rust,ignore
//! use chatfold::error::{ErrorCategory, StreamError, TransportError};
//!
//! let error = StreamError::from(TransportError::http(503, "upstream unavailable"));
//! assert_eq!(error.category(), ErrorCategory::Network);
//! assert!(error.is_retryable());
//! ```

mod conversions;
pub mod types;

pub use types::*;
