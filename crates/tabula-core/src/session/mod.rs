//! Conversational session over the current dataset.

pub mod chat;
pub mod message;

pub use chat::ChatSession;
pub use message::{ConversationTurn, TurnRole};
