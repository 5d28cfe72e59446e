//! HTTP client for the chat completions endpoint
//!
//! - `core`: client construction, request building, error mapping
//! - `streaming`: streamed completions decoded incrementally
//! - `simple`: single-shot completions

mod core;
mod simple;
mod streaming;

pub use self::core::AiClient;
pub use simple::Completion;
