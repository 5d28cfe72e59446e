//! Core library for mathchat
//!
//! Segments model replies into Markdown and LaTeX runs, renders them,
//! and decodes streamed completions into a live conversation.

pub mod ai;
pub mod chat;
pub mod config;
pub mod error;
pub mod render;
pub mod transcript;

// Re-export main types for convenience
pub use ai::{AiClient, DecodeSummary, DecoderState, StreamDecoder};
pub use chat::{ChatRole, ChatSession, Conversation, Message, MessageContent, TurnDriver};
pub use config::Config;
pub use error::{ChatError, Result};
pub use render::{
    segment, source_text, Delimiter, RenderOptions, RenderedSpan, Renderer, Span, SpanKind,
};
