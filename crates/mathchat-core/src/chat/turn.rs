//! Turn lifecycle shared by every frontend
//!
//! A turn is: record the user message with an empty reply, hand the
//! history to a request, apply each render as it arrives, then close the
//! reply with a completion or an error. `ChatSession` drives it inline;
//! the TUI drives it from a channel.

use tracing::{info, warn};

use super::conversation::{ChatRole, Conversation, MessageContent};
use super::events::TurnTracker;
use crate::ai::DecoderState;
use crate::error::{ChatError, Result};
use crate::render::RenderedSpan;

#[derive(Debug, Default)]
pub struct TurnDriver {
    conversation: Conversation,
    tracker: TurnTracker,
}

impl TurnDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn tracker(&self) -> &TurnTracker {
        &self.tracker
    }

    /// Open a turn for `text`, returning the history to send.
    ///
    /// Fails with `TurnInProgress` while a reply is still open.
    pub fn begin(&mut self, text: impl Into<String>) -> Result<Vec<(ChatRole, String)>> {
        self.conversation.begin_turn(text)?;
        let history = self.conversation.history();
        self.tracker.start_turn(history.len());
        Ok(history)
    }

    /// Replace the open reply with a newer render
    pub fn apply(&mut self, spans: Vec<RenderedSpan>) {
        if let Err(e) = self.conversation.update_last(MessageContent::rendered(spans)) {
            warn!("Dropped reply update: {}", e);
        }
    }

    /// Close the open reply after the server finished it
    pub fn complete(&mut self, chars: usize, state: DecoderState) {
        self.close();
        info!("Reply complete: {} chars", chars);
        self.tracker.complete(chars, state);
    }

    /// Close the open reply after a failure; partial content stays
    pub fn fail(&mut self, error: &ChatError) {
        self.close();
        if error.is_transport() {
            info!(
                "Keeping partial reply of {} chars",
                self.last_reply_len()
            );
        }
        self.tracker.fail(error);
    }

    /// Drop all messages. Rejected while a reply is open.
    pub fn clear(&mut self) -> Result<()> {
        self.conversation.clear()
    }

    fn close(&mut self) {
        if let Err(e) = self.conversation.finish_turn() {
            warn!("Turn already closed: {}", e);
        }
    }

    fn last_reply_len(&self) -> usize {
        self.conversation
            .messages()
            .last()
            .map(|m| m.content.text().chars().count())
            .unwrap_or_default()
    }
}
