//! Interactive REPL: the human's seat at the forum
//!
//! Plain text becomes a human turn, an empty line lets the philosophers
//! carry on, and slash commands inspect the session.

mod commands;
mod input;
mod reader;

pub use commands::{HELP, ReplCommand};
pub use input::ReplInput;
pub use reader::{LineReader, ReadOutcome};
