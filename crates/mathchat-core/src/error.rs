//! Error types for mathchat-core

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for mathchat operations.
pub type Result<T> = std::result::Result<T, ChatError>;

/// Errors that abort a whole unit of work (a turn, a config load).
///
/// Errors local to one stream line or one math span never surface here;
/// they are logged and recovered where they happen.
#[derive(Debug, Error)]
pub enum ChatError {
    // Transport errors
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("No data received from the completion stream for {0:?}")]
    StreamTimeout(std::time::Duration),

    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),

    // Conversation errors
    #[error("A reply is still streaming")]
    TurnInProgress,

    #[error("No reply is currently streaming")]
    NoActiveTurn,

    // Configuration errors
    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    /// Whether this error ended a turn at the transport level
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ChatError::Http(_)
                | ChatError::Status { .. }
                | ChatError::StreamTimeout(_)
                | ChatError::InvalidResponse(_)
        )
    }
}
