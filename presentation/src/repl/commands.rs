//! Slash command parsing

/// What one line of REPL input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Submit a human turn
    Say(String),
    /// Empty line: let the personas speak
    Continue,
    /// Show the last `n` turns
    Tail(usize),
    Status,
    Participants,
    /// Toggle display of private reasoning
    Thinking,
    Help,
    End,
    Unknown(String),
}

pub const DEFAULT_TAIL: usize = 10;

pub const HELP: &str = "\
Commands:
  <text>              Say something to the forum
  <enter>, /continue  Let the philosophers continue
  /tail [n]           Show the last n turns (default 10)
  /status             Show round, mode and state
  /participants       Show who is seated and who has fallen silent
  /thinking           Toggle display of private reasoning
  /end, /quit         End the session
  /help, /h, /?       Show this help";

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Continue;
        }
        let Some(command) = line.strip_prefix('/') else {
            return ReplCommand::Say(line.to_string());
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();
        match name.as_str() {
            "tail" | "t" => match arg.map(str::parse::<usize>) {
                None => ReplCommand::Tail(DEFAULT_TAIL),
                Some(Ok(n)) if n > 0 => ReplCommand::Tail(n),
                Some(_) => ReplCommand::Unknown(line.to_string()),
            },
            "continue" | "c" | "next" => ReplCommand::Continue,
            "status" | "s" => ReplCommand::Status,
            "participants" | "p" | "who" => ReplCommand::Participants,
            "thinking" => ReplCommand::Thinking,
            "help" | "h" | "?" => ReplCommand::Help,
            "end" | "quit" | "exit" | "q" => ReplCommand::End,
            _ => ReplCommand::Unknown(line.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_turn() {
        assert_eq!(
            ReplCommand::parse("  What is virtue?  "),
            ReplCommand::Say("What is virtue?".to_string())
        );
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Continue);
        assert_eq!(ReplCommand::parse("/continue"), ReplCommand::Continue);
    }

    #[test]
    fn test_tail() {
        assert_eq!(ReplCommand::parse("/tail"), ReplCommand::Tail(DEFAULT_TAIL));
        assert_eq!(ReplCommand::parse("/tail 3"), ReplCommand::Tail(3));
        assert_eq!(
            ReplCommand::parse("/tail 0"),
            ReplCommand::Unknown("/tail 0".to_string())
        );
        assert_eq!(
            ReplCommand::parse("/tail many"),
            ReplCommand::Unknown("/tail many".to_string())
        );
    }

    #[test]
    fn test_commands_and_aliases() {
        assert_eq!(ReplCommand::parse("/status"), ReplCommand::Status);
        assert_eq!(ReplCommand::parse("/WHO"), ReplCommand::Participants);
        assert_eq!(ReplCommand::parse("/thinking"), ReplCommand::Thinking);
        assert_eq!(ReplCommand::parse("/?"), ReplCommand::Help);
        assert_eq!(ReplCommand::parse("/end"), ReplCommand::End);
        assert_eq!(ReplCommand::parse("/quit"), ReplCommand::End);
        assert_eq!(
            ReplCommand::parse("/dance"),
            ReplCommand::Unknown("/dance".to_string())
        );
    }
}
