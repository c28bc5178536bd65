//! Core data types: normalized chunks, messages and the assembled response.

mod chunk;
mod message;
mod response;

pub use chunk::*;
pub use message::*;
pub use response::*;
