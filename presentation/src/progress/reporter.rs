//! Progress reporting for forum rounds
//!
//! Both reporters print turns as they are appended; they differ only in
//! how the waiting time between selection and append is shown.

use crate::output::console::{ConsoleFormatter, SpeakerNames};
use colored::Colorize;
use forum_application::{GenerationError, ProgressNotifier};
use forum_domain::{PersonaId, Speaker, TerminationReason, Turn};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn speaker_list(names: &SpeakerNames, speakers: &[PersonaId]) -> String {
    speakers
        .iter()
        .map(|id| names.label(&Speaker::Persona(id.clone())))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reports progress with a spinner while personas are thinking
pub struct ProgressReporter {
    names: SpeakerNames,
    show_thinking: Arc<AtomicBool>,
    round_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new(names: SpeakerNames) -> Self {
        Self {
            names,
            show_thinking: Arc::new(AtomicBool::new(false)),
            round_bar: Mutex::new(None),
        }
    }

    /// Flag shared with the REPL's `/thinking` toggle
    pub fn with_thinking(mut self, flag: Arc<AtomicBool>) -> Self {
        self.show_thinking = flag;
        self
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:20.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    /// Print above the spinner without tearing it
    fn print(&self, text: &str) {
        match self.round_bar.lock().ok().and_then(|bar| bar.clone()) {
            Some(bar) => bar.suspend(|| print!("{}", text)),
            None => print!("{}", text),
        }
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_round_start(&self, round: u32, speakers: &[PersonaId]) {
        if speakers.is_empty() {
            println!("{}", format!("Round {}: nobody wishes to speak", round).dimmed());
            return;
        }
        let bar = ProgressBar::new(speakers.len() as u64);
        bar.set_style(Self::round_style());
        bar.set_prefix(format!("Round {}", round));
        bar.set_message(format!("{} thinking...", speaker_list(&self.names, speakers)));
        bar.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut slot) = self.round_bar.lock() {
            *slot = Some(bar);
        }
    }

    fn on_generation_complete(&self, persona: &PersonaId, success: bool) {
        if let Ok(slot) = self.round_bar.lock()
            && let Some(bar) = slot.as_ref()
        {
            let name = self.names.label(&Speaker::Persona(persona.clone()));
            let status = if success {
                format!("{} {}", "v".green(), name)
            } else {
                format!("{} {}", "x".red(), name)
            };
            bar.set_message(status);
            bar.inc(1);
        }
    }

    fn on_turn_appended(&self, turn: &Turn) {
        self.print(&format!(
            "\n{}",
            ConsoleFormatter::format_turn(
                turn,
                &self.names,
                self.show_thinking.load(Ordering::Relaxed),
            )
        ));
    }

    fn on_generation_failed(&self, persona: &PersonaId, error: &GenerationError) {
        let name = self.names.label(&Speaker::Persona(persona.clone()));
        self.print(&format!("{} {} could not answer: {}\n", "!".red(), name, error));
    }

    fn on_persona_dormant(&self, persona: &PersonaId) {
        let name = self.names.label(&Speaker::Persona(persona.clone()));
        self.print(&format!("{} {} has fallen silent\n", "!".yellow(), name));
    }

    fn on_round_complete(&self, _round: u32, _appended: usize) {
        if let Ok(mut slot) = self.round_bar.lock()
            && let Some(bar) = slot.take()
        {
            bar.finish_and_clear();
        }
    }

    fn on_session_terminated(&self, reason: TerminationReason) {
        println!("\n{} {}", "Forum closed:".cyan().bold(), reason.description());
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress {
    names: SpeakerNames,
    show_thinking: Arc<AtomicBool>,
    /// Only print turns
    quiet: bool,
}

impl SimpleProgress {
    pub fn new(names: SpeakerNames) -> Self {
        Self {
            names,
            show_thinking: Arc::new(AtomicBool::new(false)),
            quiet: false,
        }
    }

    pub fn quiet(names: SpeakerNames) -> Self {
        Self {
            quiet: true,
            ..Self::new(names)
        }
    }

    /// Flag shared with the REPL's `/thinking` toggle
    pub fn with_thinking(mut self, flag: Arc<AtomicBool>) -> Self {
        self.show_thinking = flag;
        self
    }
}

impl ProgressNotifier for SimpleProgress {
    fn on_round_start(&self, round: u32, speakers: &[PersonaId]) {
        if self.quiet {
            return;
        }
        println!(
            "{} {} ({})",
            "->".cyan(),
            format!("Round {}", round).bold(),
            if speakers.is_empty() {
                "nobody wishes to speak".to_string()
            } else {
                speaker_list(&self.names, speakers)
            }
        );
    }

    fn on_turn_appended(&self, turn: &Turn) {
        println!(
            "{}",
            ConsoleFormatter::format_turn(
                turn,
                &self.names,
                self.show_thinking.load(Ordering::Relaxed),
            )
        );
    }

    fn on_generation_failed(&self, persona: &PersonaId, error: &GenerationError) {
        if !self.quiet {
            let name = self.names.label(&Speaker::Persona(persona.clone()));
            println!("  {} {} (failed: {})", "x".red(), name, error);
        }
    }

    fn on_round_complete(&self, _round: u32, _appended: usize) {}

    fn on_session_terminated(&self, reason: TerminationReason) {
        if !self.quiet {
            println!("{} {}", "Forum closed:".cyan().bold(), reason.description());
        }
    }
}
