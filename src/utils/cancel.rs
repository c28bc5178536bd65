//! Cancellation utilities
//!
//! A first-class cancellation handle for chat streams. A cancelled
//! [`ChatStream`](crate::streaming::ChatStream) stops pulling from its
//! transport before the next chunk; its partial state stays inspectable but
//! it will not assemble a final response.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// A handle that can be used to request cancellation.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Create a fresh, uncancelled handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Streams observing this handle stop before
    /// polling their transport again; dropping the stream afterwards closes
    /// the connection.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
