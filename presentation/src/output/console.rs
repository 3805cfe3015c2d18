//! Console output formatter for forum sessions

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use forum_application::RunForumOutput;
use forum_domain::{ParticipantRecord, PersonaId, SessionSnapshot, SessionSummary, Speaker, Turn};
use std::collections::HashMap;

/// Display names keyed by persona id
#[derive(Debug, Clone, Default)]
pub struct SpeakerNames {
    names: HashMap<PersonaId, String>,
}

impl SpeakerNames {
    pub fn from_records(records: &[ParticipantRecord]) -> Self {
        Self {
            names: records
                .iter()
                .map(|r| (r.profile.id.clone(), r.profile.name.clone()))
                .collect(),
        }
    }

    pub fn label(&self, speaker: &Speaker) -> String {
        match speaker {
            Speaker::Human => "You".to_string(),
            Speaker::System => "System".to_string(),
            Speaker::Persona(id) => self
                .names
                .get(id)
                .cloned()
                .unwrap_or_else(|| id.to_string()),
        }
    }
}

/// Formats forum sessions for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One turn, with its private reasoning underneath when requested
    pub fn format_turn(turn: &Turn, names: &SpeakerNames, show_thinking: bool) -> String {
        let label = names.label(&turn.speaker);
        let label = match turn.speaker {
            Speaker::Human => label.green().bold(),
            Speaker::Persona(_) => label.yellow().bold(),
            Speaker::System => label.dimmed(),
        };
        let mut output = format!(
            "{} {}\n{}\n",
            format!("#{}", turn.sequence).dimmed(),
            label,
            Self::indent(&turn.content, "  ")
        );
        if show_thinking && let Some(thinking) = &turn.thinking {
            output.push_str(&format!(
                "{}\n",
                Self::indent(&format!("({})", thinking), "    ").dimmed()
            ));
        }
        output
    }

    /// Complete transcript of a session
    pub fn format_transcript(snapshot: &SessionSnapshot, show_thinking: bool) -> String {
        let names = SpeakerNames::from_records(&snapshot.participants);
        let mut output = String::new();

        output.push_str(&Self::header("Philosopher Forum"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Title:".cyan().bold(), snapshot.title));
        output.push_str(&format!(
            "{} {}\n",
            "Mode:".cyan().bold(),
            snapshot.config.mode.description()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Participants:".cyan().bold(),
            snapshot
                .participants
                .iter()
                .map(|r| r.profile.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));

        let mut current_round = None;
        for turn in &snapshot.turns {
            if current_round != Some(turn.round) {
                current_round = Some(turn.round);
                output.push_str(&Self::section_header(&format!("Round {}", turn.round)));
            }
            output.push('\n');
            output.push_str(&Self::format_turn(turn, &names, show_thinking));
        }

        output.push('\n');
        output.push_str(&Self::format_ending(snapshot.round, snapshot.termination.map(|r| r.description())));
        output.push_str(&Self::footer());
        output
    }

    fn format_ending(rounds: u32, termination: Option<&str>) -> String {
        match termination {
            Some(reason) => format!(
                "{} after {} round(s): {}\n",
                "Session ended".cyan().bold(),
                rounds,
                reason
            ),
            None => format!(
                "{} after {} round(s)\n",
                "Session paused".cyan().bold(),
                rounds
            ),
        }
    }

    /// Format as JSON
    pub fn format_json(snapshot: &SessionSnapshot) -> String {
        serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| "{}".to_string())
    }

    /// Stored sessions, one per line
    pub fn format_session_list(sessions: &[SessionSummary]) -> String {
        if sessions.is_empty() {
            return "No stored sessions.\n".to_string();
        }
        let mut output = String::new();
        for s in sessions {
            let status = match s.termination {
                Some(reason) => reason.as_str().to_string(),
                None => "resumable".green().to_string(),
            };
            output.push_str(&format!(
                "{}  {:<11} {:>3} rounds {:>4} turns  {:<16} {}  {}\n",
                s.id.to_string().bold(),
                s.mode.as_str(),
                s.round,
                s.turn_count,
                status,
                s.updated_at.format("%Y-%m-%d %H:%M"),
                s.title
            ));
        }
        output
    }

    pub fn format_session_list_json(sessions: &[SessionSummary]) -> String {
        serde_json::to_string_pretty(sessions).unwrap_or_else(|_| "[]".to_string())
    }

    /// One-line wrap-up printed when a run finishes
    pub fn format_outcome(outcome: &RunForumOutput) -> String {
        let ending = Self::format_ending(
            outcome.rounds,
            outcome.termination.map(|r| r.description()),
        );
        format!(
            "{}{} {} ({} turns)\n",
            ending,
            "Session id:".dimmed(),
            outcome.session_id,
            outcome.turns
        )
    }

    /// `/status` output
    pub fn format_status(summary: &SessionSummary) -> String {
        format!(
            "{} {}\n{} {} (round {} done, {} turns)\n{} {}\n",
            "Session:".cyan().bold(),
            summary.id,
            "Mode:".cyan().bold(),
            summary.mode,
            summary.round,
            summary.turn_count,
            "State:".cyan().bold(),
            summary.state
        )
    }

    /// `/participants` output
    pub fn format_participants(records: &[ParticipantRecord]) -> String {
        let mut output = String::new();
        for record in records {
            let mut flags = Vec::new();
            if record.dormant {
                flags.push("dormant".red().to_string());
            }
            if record.is_cooling_down() {
                flags.push(format!("cooling down {}", record.cooldown_remaining));
            }
            if record.consecutive_failure_count > 0 {
                flags.push(format!("{} failure(s)", record.consecutive_failure_count));
            }
            let last = record
                .last_spoke_round
                .map(|r| format!("last spoke in round {}", r))
                .unwrap_or_else(|| "has not spoken".to_string());
            output.push_str(&format!(
                "  {:<20} {}{}\n",
                record.profile.name.bold(),
                last,
                if flags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", flags.join(", "))
                }
            ));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_transcript(&self, snapshot: &SessionSnapshot, show_thinking: bool) -> String {
        Self::format_transcript(snapshot, show_thinking)
    }

    fn format_json(&self, snapshot: &SessionSnapshot) -> String {
        Self::format_json(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_domain::{ForumConfig, ForumMode, ForumSession, PersonaPreset, TerminationReason};

    fn session() -> ForumSession {
        ForumSession::new(
            "lying",
            ForumConfig::new(ForumMode::Debate),
            [PersonaPreset::Kant.profile(), PersonaPreset::Nietzsche.profile()],
        )
        .unwrap()
    }

    #[test]
    fn test_speaker_names() {
        let session = session();
        let names = SpeakerNames::from_records(session.registry().records());
        assert_eq!(names.label(&Speaker::Human), "You");
        assert_eq!(
            names.label(&Speaker::Persona(PersonaPreset::Kant.id())),
            "Immanuel Kant"
        );
        assert_eq!(
            names.label(&Speaker::Persona(PersonaPreset::Plato.id())),
            "plato"
        );
    }

    #[test]
    fn test_transcript_contains_turns_and_ending() {
        let mut session = session();
        session.submit_human_turn("Is it ever right to lie?").unwrap();
        session.terminate(TerminationReason::EndRequested);
        let snapshot = session.export();

        let text = ConsoleFormatter::format_transcript(&snapshot, false);
        assert!(text.contains("lying"));
        assert!(text.contains("Immanuel Kant"));
        assert!(text.contains("Is it ever right to lie?"));
        assert!(text.contains(TerminationReason::EndRequested.description()));
    }

    #[test]
    fn test_thinking_only_when_requested() {
        let turn = Turn {
            sequence: 4,
            speaker: Speaker::Persona(PersonaPreset::Kant.id()),
            content: "Never.".to_string(),
            thinking: Some("duty first".to_string()),
            round: 2,
            timestamp: chrono::Utc::now(),
        };
        let names = SpeakerNames::default();
        assert!(!ConsoleFormatter::format_turn(&turn, &names, false).contains("duty first"));
        assert!(ConsoleFormatter::format_turn(&turn, &names, true).contains("duty first"));
    }

    #[test]
    fn test_json_round_trips() {
        let snapshot = session().export();
        let json = ConsoleFormatter::format_json(&snapshot);
        let parsed: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, snapshot.id);
    }

    #[test]
    fn test_empty_session_list() {
        assert_eq!(
            ConsoleFormatter::format_session_list(&[]),
            "No stored sessions.\n"
        );
        assert_eq!(ConsoleFormatter::format_session_list_json(&[]), "[]");
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }
}
