//! Conversation state and turn handling

mod conversation;
pub mod events;
mod session;
mod turn;

pub use conversation::{ChatRole, Conversation, Message, MessageContent};
pub use events::{TurnEvent, TurnTracker};
pub use session::ChatSession;
pub use turn::TurnDriver;
