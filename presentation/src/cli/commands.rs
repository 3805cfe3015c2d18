//! CLI command definitions

use clap::{Parser, ValueEnum};
use forum_domain::{ForumMode, SessionId};
use std::path::PathBuf;

/// Output format for transcripts and session listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable text
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for philosopher-forum
#[derive(Parser, Debug)]
#[command(name = "philosopher-forum")]
#[command(author, version, about = "A forum where philosopher personas discuss with you and each other")]
#[command(long_about = r#"
Philosopher Forum seats several philosopher personas around one conversation.

Every round each persona is scored for how much it wants to speak, based on
its temperament, the topics it cares about and what was just said. The
strongest voices above the activation threshold take a turn, then the floor
returns to you. Sessions always end: a hard round ceiling caps every forum.

Modes:
  consensus    personas look for common ground
  debate       personas rebut positions they disagree with
  exploration  open, curiosity-driven inquiry

Configuration files are loaded from (in priority order):
1. PHILOSOPHER_FORUM_* environment variables
2. --config <path>     Explicit config file
3. ./forum.toml        Project-level config
4. ~/.config/philosopher-forum/config.toml   Global config

Example:
  philosopher-forum "Is it ever right to lie?"
  philosopher-forum --mode debate -p kant -p nietzsche "Is morality invented?"
  philosopher-forum --autonomous --ceiling 6 "What is a good life?"
  philosopher-forum --list-sessions
"#)]
pub struct Cli {
    /// Opening topic or question (optional in interactive mode)
    pub topic: Option<String>,

    /// Forum mode: consensus, debate or exploration
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<ForumMode>,

    /// Personas to seat (can be specified multiple times)
    #[arg(short, long = "persona", value_name = "ID")]
    pub personas: Vec<String>,

    /// Maximum personas speaking in one round
    #[arg(long, value_name = "N")]
    pub max_speakers: Option<usize>,

    /// Hard round ceiling
    #[arg(long, value_name = "ROUNDS")]
    pub ceiling: Option<u32>,

    /// Activation threshold in [0, 1]
    #[arg(long, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Let the personas talk without waiting for you
    #[arg(short, long)]
    pub autonomous: bool,

    /// Resume a stored session
    #[arg(long, value_name = "ID", conflicts_with_all = ["list_sessions", "delete_session", "transcript"])]
    pub resume: Option<SessionId>,

    /// List stored sessions and exit
    #[arg(long)]
    pub list_sessions: bool,

    /// Delete a stored session and exit
    #[arg(long, value_name = "ID")]
    pub delete_session: Option<SessionId>,

    /// Print the transcript of a stored session and exit
    #[arg(long, value_name = "ID")]
    pub transcript: Option<SessionId>,

    /// Show each persona's private reasoning
    #[arg(long)]
    pub show_thinking: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_forum_flags() {
        let cli = Cli::try_parse_from([
            "philosopher-forum",
            "--mode",
            "debate",
            "-p",
            "kant",
            "-p",
            "nietzsche",
            "--ceiling",
            "6",
            "--autonomous",
            "Is morality invented?",
        ])
        .unwrap();

        assert_eq!(cli.mode, Some(ForumMode::Debate));
        assert_eq!(cli.personas, vec!["kant", "nietzsche"]);
        assert_eq!(cli.ceiling, Some(6));
        assert!(cli.autonomous);
        assert_eq!(cli.topic.as_deref(), Some("Is morality invented?"));
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn test_rejects_bad_mode_and_session_id() {
        assert!(Cli::try_parse_from(["philosopher-forum", "--mode", "shouting"]).is_err());
        assert!(Cli::try_parse_from(["philosopher-forum", "--resume", "nope"]).is_err());
    }

    #[test]
    fn test_resume_conflicts_with_listing() {
        let id = SessionId::new().to_string();
        assert!(
            Cli::try_parse_from(["philosopher-forum", "--resume", &id, "--list-sessions"])
                .is_err()
        );
    }
}
