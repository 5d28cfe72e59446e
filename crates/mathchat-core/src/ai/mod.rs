//! Completion API client and stream decoding

pub mod client;
pub mod sse;
pub mod streaming;
pub mod types;

pub use client::{AiClient, Completion};
pub use sse::{StreamAccumulator, StreamDecoder};
pub use streaming::{DecodeSummary, DecoderState, SseEvent};
