//! Ordered message log for one chat
//!
//! The log is append-only, except that the last message may be replaced in
//! place while its reply is streaming. At most one message is active, and
//! it is always the last one.

use serde::Serialize;

use crate::error::{ChatError, Result};
use crate::render::{source_text, RenderedSpan};

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Role name on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a message shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// User input, as typed
    Raw(String),
    /// Assistant reply, rendered from `source`
    Rendered {
        source: String,
        spans: Vec<RenderedSpan>,
    },
}

impl MessageContent {
    /// Rendered content whose source is restored from the spans
    pub fn rendered(spans: Vec<RenderedSpan>) -> Self {
        MessageContent::Rendered {
            source: source_text(&spans),
            spans,
        }
    }

    /// Plain text of the message
    pub fn text(&self) -> &str {
        match self {
            MessageContent::Raw(text) => text,
            MessageContent::Rendered { source, .. } => source,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: ChatRole,
    pub content: MessageContent,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: MessageContent::Raw(text.into()),
        }
    }

    /// Empty assistant message, filled in as the reply streams
    pub fn assistant_placeholder() -> Self {
        Self {
            role: ChatRole::Assistant,
            content: MessageContent::Rendered {
                source: String::new(),
                spans: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    /// Whether the last message is a reply still being written
    active: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether a reply is streaming into the last message
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Append a finished message
    pub fn append(&mut self, message: Message) -> Result<()> {
        if self.active {
            return Err(ChatError::TurnInProgress);
        }
        self.messages.push(message);
        Ok(())
    }

    /// Append the user message and an active, empty assistant reply
    pub fn begin_turn(&mut self, user_text: impl Into<String>) -> Result<()> {
        if self.active {
            return Err(ChatError::TurnInProgress);
        }
        self.messages.push(Message::user(user_text));
        self.messages.push(Message::assistant_placeholder());
        self.active = true;
        Ok(())
    }

    /// Replace the active message's content with a newer render
    pub fn update_last(&mut self, content: MessageContent) -> Result<()> {
        if !self.active {
            return Err(ChatError::NoActiveTurn);
        }
        match self.messages.last_mut() {
            Some(last) => {
                last.content = content;
                Ok(())
            }
            None => Err(ChatError::NoActiveTurn),
        }
    }

    /// Mark the active reply finished; its current content is kept
    pub fn finish_turn(&mut self) -> Result<()> {
        if !self.active {
            return Err(ChatError::NoActiveTurn);
        }
        self.active = false;
        Ok(())
    }

    /// `(role, text)` pairs to send as request history.
    ///
    /// The active reply is excluded, so calling this right after
    /// `begin_turn` gives exactly what the new request needs.
    pub fn history(&self) -> Vec<(ChatRole, String)> {
        let settled = if self.active {
            &self.messages[..self.messages.len().saturating_sub(1)]
        } else {
            &self.messages[..]
        };
        settled
            .iter()
            .map(|m| (m.role, m.content.text().to_string()))
            .collect()
    }

    /// Drop all messages. Rejected while a reply is streaming.
    pub fn clear(&mut self) -> Result<()> {
        if self.active {
            return Err(ChatError::TurnInProgress);
        }
        self.messages.clear();
        Ok(())
    }
}
