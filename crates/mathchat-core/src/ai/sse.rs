//! SSE (Server-Sent Events) stream decoding
//!
//! Chunks arrive in order but are not aligned to line boundaries. Complete
//! lines are cut from a byte buffer, `data:` payloads are parsed, and the
//! reply text grows one fragment at a time. After every fragment the whole
//! reply is segmented and rendered again, since a math delimiter pair can be
//! split across chunks.

use std::pin::pin;
use std::time::{Duration, Instant};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tracing::{debug, info, warn};

use super::streaming::{DecodeSummary, DecoderState, SseEvent};
use super::types::StreamChunk;
use crate::error::{ChatError, Result};
use crate::render::{RenderedSpan, Renderer};

const DATA_PREFIX: &str = "data:";
const DONE_SENTINEL: &str = "[DONE]";

/// Line buffer and reply text for one in-flight stream
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    /// Undecoded tail after the last newline
    buffer: Vec<u8>,
    /// All content decoded so far
    assembled_text: String,
    events: usize,
    malformed_lines: usize,
    bytes_received: usize,
    done: bool,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return the events of every line it completed.
    ///
    /// Nothing after a `[DONE]` line is examined, and once done every later
    /// chunk yields no events.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        if self.done {
            return Vec::new();
        }
        self.bytes_received += chunk.len();
        self.buffer.extend_from_slice(chunk);

        // Splitting on the raw byte is safe: `\n` never occurs inside a
        // multi-byte UTF-8 sequence
        let Some(last_newline) = self.buffer.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };
        let complete: Vec<u8> = self.buffer.drain(..=last_newline).collect();

        let mut events = Vec::new();
        for line in complete.split(|&b| b == b'\n') {
            let line = String::from_utf8_lossy(line);
            match self.parse_line(&line) {
                Some(SseEvent::Done) => {
                    self.done = true;
                    self.buffer.clear();
                    events.push(SseEvent::Done);
                    break;
                }
                Some(event) => events.push(event),
                None => {}
            }
        }
        events
    }

    /// Append a decoded fragment to the reply
    pub fn append(&mut self, fragment: &str) {
        self.assembled_text.push_str(fragment);
    }

    pub fn assembled_text(&self) -> &str {
        &self.assembled_text
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Bytes of an unterminated trailing line
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Classify one complete line. `None` for non-data and malformed lines.
    fn parse_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line.trim();
        // Blank lines, `:` keep-alive comments and other SSE fields
        let payload = line.strip_prefix(DATA_PREFIX)?.trim();
        self.events += 1;

        if payload == DONE_SENTINEL {
            return Some(SseEvent::Done);
        }

        match serde_json::from_str::<StreamChunk>(payload) {
            Ok(chunk) => Some(match chunk.into_content() {
                Some(content) => SseEvent::TextDelta(content),
                None => SseEvent::Skip,
            }),
            Err(e) => {
                self.malformed_lines += 1;
                warn!(
                    "Failed to parse SSE JSON (event #{}): {} - line: {}",
                    self.events, e, line
                );
                None
            }
        }
    }

    fn into_summary(self, state: DecoderState) -> DecodeSummary {
        DecodeSummary {
            text: self.assembled_text,
            state,
            events: self.events,
            malformed_lines: self.malformed_lines,
            bytes_received: self.bytes_received,
            saw_done: self.done,
        }
    }
}

/// Drives a chunk source to completion, re-rendering after every increment
pub struct StreamDecoder<'r> {
    renderer: &'r Renderer,
    idle_timeout: Option<Duration>,
    state: DecoderState,
}

impl<'r> StreamDecoder<'r> {
    pub fn new(renderer: &'r Renderer) -> Self {
        Self {
            renderer,
            idle_timeout: None,
            state: DecoderState::Reading,
        }
    }

    /// Fail the stream when no chunk arrives within `timeout`
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Read `source` until `[DONE]`, end of stream, or a transport error.
    ///
    /// `on_update` receives the freshly rendered reply after every content
    /// fragment; it replaces, not extends, whatever was shown before. The
    /// source is dropped on every exit path.
    pub async fn decode<S, E, F>(&mut self, source: S, mut on_update: F) -> Result<DecodeSummary>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: Into<ChatError>,
        F: FnMut(Vec<RenderedSpan>),
    {
        let mut source = pin!(source);
        let mut acc = StreamAccumulator::new();
        let started = Instant::now();
        self.state = DecoderState::Reading;
        info!("SSE stream decoding started");

        while self.state == DecoderState::Reading {
            let next = match self.idle_timeout {
                Some(timeout) => match tokio::time::timeout(timeout, source.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        self.state = DecoderState::Failed;
                        warn!("SSE stream idle for {:?}, giving up", timeout);
                        return Err(ChatError::StreamTimeout(timeout));
                    }
                },
                None => source.next().await,
            };

            let chunk = match next {
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => {
                    self.state = DecoderState::Failed;
                    let err: ChatError = e.into();
                    warn!(
                        "SSE stream failed after {:?}, {} bytes: {}",
                        started.elapsed(),
                        acc.bytes_received,
                        err
                    );
                    return Err(err);
                }
                None => {
                    if acc.pending_bytes() > 0 {
                        debug!(
                            "SSE stream ended with {} bytes of unterminated line, discarding",
                            acc.pending_bytes()
                        );
                    }
                    self.state = DecoderState::Done;
                    break;
                }
            };

            debug!("SSE chunk received: {} bytes", chunk.len());
            for event in acc.push(&chunk) {
                match event {
                    SseEvent::TextDelta(fragment) => {
                        debug!("  -> TextDelta: {} chars", fragment.len());
                        acc.append(&fragment);
                        on_update(self.renderer.render_text(acc.assembled_text()));
                    }
                    SseEvent::Done => {
                        info!("SSE stream [DONE] marker received after {:?}", started.elapsed());
                        self.state = DecoderState::Done;
                    }
                    SseEvent::Skip => debug!("  -> Skip event"),
                }
            }
        }

        let summary = acc.into_summary(self.state);
        info!(
            "SSE stream finished: {:?} elapsed, {} events, {} malformed, {} bytes, {} chars",
            started.elapsed(),
            summary.events,
            summary.malformed_lines,
            summary.bytes_received,
            summary.text.len()
        );
        Ok(summary)
    }
}
