//! Streaming types for completion responses

use serde::Serialize;

/// Decoder state machine: `Reading -> Reading | Done | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecoderState {
    /// Awaiting more chunks
    Reading,
    /// `[DONE]` received or the source ended
    Done,
    /// The transport failed; the error was returned to the caller
    Failed,
}

/// Event extracted from one complete `data:` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Incremental reply text
    TextDelta(String),
    /// The `[DONE]` sentinel
    Done,
    /// Well-formed payload without content (role header, finish reason, usage)
    Skip,
}

/// Result of a completed decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Full assembled reply text
    pub text: String,
    pub state: DecoderState,
    /// `data:` events seen, including skipped and malformed ones
    pub events: usize,
    pub malformed_lines: usize,
    pub bytes_received: usize,
    /// Whether the `[DONE]` sentinel (rather than end of stream) ended decoding
    pub saw_done: bool,
}
