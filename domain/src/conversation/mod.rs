//! Conversation subdomain: turns and the append-only log that orders them.

pub mod log;
pub mod turn;

pub use log::ConversationLog;
pub use turn::{NewTurn, Speaker, Turn};
