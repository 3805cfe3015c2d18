//! Execution parameters for the forum loop
//!
//! [`ExecutionParams`] groups the timing knobs of
//! [`TurnScheduler`](crate::use_cases::turn_scheduler::TurnScheduler) and
//! [`RunForumUseCase`](crate::use_cases::run_forum::RunForumUseCase).
//! Forum policy (mode, ceiling, thresholds) lives in the domain's
//! `ForumConfig`; these are application-layer concerns.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Upper bound on one generator call; a timeout counts as a failure.
    pub generation_timeout: Option<Duration>,
    /// How long `AwaitingInput` waits for a human before advancing on its own.
    /// `None` waits forever.
    pub input_timeout: Option<Duration>,
    /// Save a snapshot to the session store after every round.
    pub save_every_round: bool,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            generation_timeout: Some(Duration::from_secs(120)),
            input_timeout: None,
            save_every_round: true,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_input_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.input_timeout = timeout;
        self
    }

    pub fn with_save_every_round(mut self, save: bool) -> Self {
        self.save_every_round = save;
        self
    }
}
