//! Presentation layer for philosopher-forum
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive REPL.

pub mod cli;
pub mod config;
pub mod output;
pub mod progress;
pub mod repl;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use config::ReplConfig;
pub use output::console::{ConsoleFormatter, SpeakerNames};
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use repl::{LineReader, ReplCommand, ReplInput};
