//! Turn scheduler state machine
//!
//! ```text
//! AwaitingInput → Scoring → Selecting → Generating → Appending → Evaluating
//!       ↑                                                            │
//!       └────────────────────────────────────────────────────────────┘
//!                         (any state) → Terminated
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    /// Waiting for a human turn, or for the driver to start the next round
    #[default]
    AwaitingInput,
    Scoring,
    Selecting,
    /// Generation calls for the selected personas are in flight
    Generating,
    Appending,
    Evaluating,
    /// Absorbing: no further turns are accepted
    Terminated,
}

impl SchedulerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulerState::AwaitingInput => "awaiting_input",
            SchedulerState::Scoring => "scoring",
            SchedulerState::Selecting => "selecting",
            SchedulerState::Generating => "generating",
            SchedulerState::Appending => "appending",
            SchedulerState::Evaluating => "evaluating",
            SchedulerState::Terminated => "terminated",
        }
    }

    /// Operation name used when entering this state is rejected
    pub fn entry_operation(&self) -> &'static str {
        match self {
            SchedulerState::AwaitingInput => "await input",
            SchedulerState::Scoring => "score participants",
            SchedulerState::Selecting => "select speakers",
            SchedulerState::Generating => "generate responses",
            SchedulerState::Appending => "append turns",
            SchedulerState::Evaluating => "evaluate the round",
            SchedulerState::Terminated => "terminate",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SchedulerState::Terminated)
    }

    /// A round is in progress
    pub fn is_mid_round(&self) -> bool {
        !matches!(
            self,
            SchedulerState::AwaitingInput | SchedulerState::Terminated
        )
    }

    pub fn can_transition_to(&self, next: SchedulerState) -> bool {
        use SchedulerState::*;
        match (self, next) {
            (Terminated, _) => false,
            (_, Terminated) => true,
            (AwaitingInput, Scoring)
            | (Scoring, Selecting)
            | (Selecting, Generating)
            | (Generating, Appending)
            | (Appending, Evaluating)
            | (Evaluating, AwaitingInput) => true,
            _ => false,
        }
    }
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The hard round ceiling was hit
    CeilingReached,
    /// No persona was eligible and no human input arrived
    Stalled,
    /// The session owner asked to end it
    EndRequested,
    /// A cancellation signal stopped the session; in-flight results were discarded
    Cancelled,
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::CeilingReached => "ceiling_reached",
            TerminationReason::Stalled => "stalled",
            TerminationReason::EndRequested => "end_requested",
            TerminationReason::Cancelled => "cancelled",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TerminationReason::CeilingReached => "the round ceiling was reached",
            TerminationReason::Stalled => "no philosopher had anything more to say",
            TerminationReason::EndRequested => "the session was ended on request",
            TerminationReason::Cancelled => "the session was cancelled",
        }
    }

    /// Ended by a safety limit rather than by the conversation itself
    pub fn is_safety_limit(&self) -> bool {
        matches!(self, TerminationReason::CeilingReached)
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SchedulerState::*;

    #[test]
    fn test_round_cycle() {
        let cycle = [
            AwaitingInput,
            Scoring,
            Selecting,
            Generating,
            Appending,
            Evaluating,
            AwaitingInput,
        ];
        for pair in cycle.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_no_skipping_states() {
        assert!(!AwaitingInput.can_transition_to(Generating));
        assert!(!Scoring.can_transition_to(Appending));
        assert!(!Evaluating.can_transition_to(Scoring));
    }

    #[test]
    fn test_terminated_is_absorbing() {
        for state in [AwaitingInput, Scoring, Generating, Evaluating] {
            assert!(state.can_transition_to(Terminated));
        }
        for next in [AwaitingInput, Scoring, Terminated] {
            assert!(!Terminated.can_transition_to(next));
        }
    }

    #[test]
    fn test_mid_round() {
        assert!(!AwaitingInput.is_mid_round());
        assert!(Generating.is_mid_round());
        assert!(!Terminated.is_mid_round());
    }

    #[test]
    fn test_reason_serde() {
        let json = serde_json::to_string(&TerminationReason::CeilingReached).unwrap();
        assert_eq!(json, "\"ceiling_reached\"");
        assert!(TerminationReason::CeilingReached.is_safety_limit());
        assert!(!TerminationReason::Stalled.is_safety_limit());
    }
}
