//! REPL adapter for the human input port

use super::commands::{HELP, ReplCommand};
use super::reader::{LineReader, ReadOutcome};
use crate::output::console::{ConsoleFormatter, SpeakerNames};
use async_trait::async_trait;
use colored::Colorize;
use forum_application::{HumanInput, HumanInputError, HumanInputPort, SessionHandle};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

const PROMPT: &str = "you> ";

/// Reads the human's next move from the terminal
pub struct ReplInput {
    reader: LineReader,
    session: SessionHandle,
    show_thinking: Arc<AtomicBool>,
    queued: Mutex<VecDeque<HumanInput>>,
}

impl ReplInput {
    pub fn new(reader: LineReader, session: SessionHandle) -> Self {
        Self {
            reader,
            session,
            show_thinking: Arc::new(AtomicBool::new(false)),
            queued: Mutex::new(VecDeque::new()),
        }
    }

    /// Share the thinking display flag with the progress reporter
    pub fn with_thinking_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.show_thinking = flag;
        self
    }

    /// Answer the first prompt without asking, e.g. `Continue` after an opening topic
    pub fn with_initial(self, input: HumanInput) -> Self {
        if let Ok(mut queued) = self.queued.lock() {
            queued.push_back(input);
        }
        self
    }

    pub fn print_welcome(&self, title: &str, participants: &[String]) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│              Philosopher Forum              │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("{} {}", "Topic:".cyan().bold(), title);
        println!("{} {}", "Seated:".cyan().bold(), participants.join(", "));
        println!();
        println!("{}", HELP);
        println!();
    }

    fn next_queued(&self) -> Option<HumanInput> {
        self.queued.lock().ok().and_then(|mut q| q.pop_front())
    }

    async fn names(&self) -> SpeakerNames {
        SpeakerNames::from_records(&self.session.participants().await)
    }

    /// Run a command that only inspects the session
    async fn show(&self, command: ReplCommand) {
        match command {
            ReplCommand::Tail(n) => {
                let turns = self.session.tail(n).await;
                if turns.is_empty() {
                    println!("{}", "Nothing has been said yet.".dimmed());
                }
                let names = self.names().await;
                let thinking = self.show_thinking.load(Ordering::Relaxed);
                for turn in &turns {
                    println!("{}", ConsoleFormatter::format_turn(turn, &names, thinking));
                }
            }
            ReplCommand::Status => {
                print!("{}", ConsoleFormatter::format_status(&self.session.summary().await));
            }
            ReplCommand::Participants => {
                print!(
                    "{}",
                    ConsoleFormatter::format_participants(&self.session.participants().await)
                );
            }
            ReplCommand::Thinking => {
                let now = !self.show_thinking.fetch_xor(true, Ordering::Relaxed);
                println!(
                    "Private reasoning is now {}.",
                    if now { "shown" } else { "hidden" }
                );
            }
            ReplCommand::Help => println!("{}", HELP),
            ReplCommand::Unknown(line) => {
                println!("Unknown command: {}. Type /help for commands.", line);
            }
            ReplCommand::Say(_) | ReplCommand::Continue | ReplCommand::End => {}
        }
    }
}

#[async_trait]
impl HumanInputPort for ReplInput {
    async fn next_input(&self) -> Result<HumanInput, HumanInputError> {
        if let Some(input) = self.next_queued() {
            return Ok(input);
        }
        loop {
            match self.reader.read_line(PROMPT).await {
                ReadOutcome::Line(line) => match ReplCommand::parse(&line) {
                    ReplCommand::Say(text) => return Ok(HumanInput::Message(text)),
                    ReplCommand::Continue => return Ok(HumanInput::Continue),
                    ReplCommand::End => return Ok(HumanInput::EndSession),
                    command => self.show(command).await,
                },
                ReadOutcome::Interrupted => return Err(HumanInputError::Cancelled),
                ReadOutcome::Eof => return Ok(HumanInput::EndSession),
                ReadOutcome::Failed(e) => return Err(HumanInputError::Io(e)),
            }
        }
    }
}
