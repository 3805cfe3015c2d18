//! Progress notification port
//!
//! Defines the interface for reporting what happens during a forum round.

use crate::ports::response_generator::GenerationError;
use forum_domain::{PersonaId, TerminationReason, Turn};

/// Callback for progress updates during a forum session
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once speakers are selected, before generation starts
    fn on_round_start(&self, round: u32, speakers: &[PersonaId]);

    /// Called when one persona's generation call finishes
    fn on_generation_complete(&self, _persona: &PersonaId, _success: bool) {}

    /// Called for every turn written to the log, in log order
    fn on_turn_appended(&self, turn: &Turn);

    fn on_generation_failed(&self, _persona: &PersonaId, _error: &GenerationError) {}

    fn on_persona_dormant(&self, _persona: &PersonaId) {}

    /// Called after evaluation
    fn on_round_complete(&self, round: u32, appended: usize);

    fn on_session_terminated(&self, _reason: TerminationReason) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_round_start(&self, _round: u32, _speakers: &[PersonaId]) {}
    fn on_turn_appended(&self, _turn: &Turn) {}
    fn on_round_complete(&self, _round: u32, _appended: usize) {}
}
