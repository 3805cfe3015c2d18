//! Session-scoped forum configuration.
//!
//! [`ForumConfig`] is fixed when a session is created and read-only
//! afterwards; the scheduler never mutates it.

use super::mode::ForumMode;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForumConfig {
    pub mode: ForumMode,
    /// Upper bound on personas selected in one round
    pub max_speakers_per_round: usize,
    /// Rounds after which the session is forcibly terminated
    pub hard_round_ceiling: u32,
    /// A persona must score strictly above this to be selected
    pub activation_threshold: f64,
    /// Consecutive generation failures before a persona goes dormant
    pub failure_dormancy_threshold: u32,
    /// Rounds a persona sits out after speaking
    pub cooldown_rounds: u32,
    /// Max consecutive turns without a human turn (consensus/exploration)
    pub monopoly_limit: u32,
    /// Recent turns handed to the response generator
    pub context_window: usize,
    /// Recent turns considered by activation scoring
    pub scoring_window: usize,
    /// Run rounds without waiting for human input
    pub autonomous: bool,
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            mode: ForumMode::default(),
            max_speakers_per_round: 2,
            hard_round_ceiling: 20,
            activation_threshold: 0.5,
            failure_dormancy_threshold: 3,
            cooldown_rounds: 1,
            monopoly_limit: 3,
            context_window: 8,
            scoring_window: 5,
            autonomous: false,
        }
    }
}

impl ForumConfig {
    pub fn new(mode: ForumMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_mode(mut self, mode: ForumMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_speakers(mut self, max: usize) -> Self {
        self.max_speakers_per_round = max;
        self
    }

    pub fn with_hard_round_ceiling(mut self, ceiling: u32) -> Self {
        self.hard_round_ceiling = ceiling;
        self
    }

    pub fn with_activation_threshold(mut self, threshold: f64) -> Self {
        self.activation_threshold = threshold;
        self
    }

    pub fn with_failure_dormancy_threshold(mut self, threshold: u32) -> Self {
        self.failure_dormancy_threshold = threshold;
        self
    }

    pub fn with_cooldown_rounds(mut self, rounds: u32) -> Self {
        self.cooldown_rounds = rounds;
        self
    }

    pub fn with_monopoly_limit(mut self, limit: u32) -> Self {
        self.monopoly_limit = limit;
        self
    }

    pub fn with_context_window(mut self, turns: usize) -> Self {
        self.context_window = turns;
        self
    }

    pub fn with_scoring_window(mut self, turns: usize) -> Self {
        self.scoring_window = turns;
        self
    }

    pub fn with_autonomous(mut self, autonomous: bool) -> Self {
        self.autonomous = autonomous;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let invalid = |msg: &str| Err(DomainError::InvalidConfig(msg.to_string()));
        if self.max_speakers_per_round == 0 {
            return invalid("max_speakers_per_round must be at least 1");
        }
        if self.hard_round_ceiling == 0 {
            return invalid("hard_round_ceiling must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.activation_threshold) {
            return invalid("activation_threshold must be within [0, 1]");
        }
        if self.failure_dormancy_threshold == 0 {
            return invalid("failure_dormancy_threshold must be at least 1");
        }
        if self.monopoly_limit == 0 {
            return invalid("monopoly_limit must be at least 1");
        }
        if self.context_window == 0 {
            return invalid("context_window must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ForumConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hard_round_ceiling, 20);
        assert_eq!(config.failure_dormancy_threshold, 3);
        assert!(!config.autonomous);
    }

    #[test]
    fn test_builder() {
        let config = ForumConfig::new(ForumMode::Debate)
            .with_max_speakers(1)
            .with_hard_round_ceiling(10)
            .with_activation_threshold(0.25)
            .with_autonomous(true);

        assert_eq!(config.mode, ForumMode::Debate);
        assert_eq!(config.max_speakers_per_round, 1);
        assert_eq!(config.hard_round_ceiling, 10);
        assert_eq!(config.activation_threshold, 0.25);
        assert!(config.autonomous);
    }

    #[test]
    fn test_validate_rejects_unsafe_limits() {
        assert!(ForumConfig::default().with_hard_round_ceiling(0).validate().is_err());
        assert!(ForumConfig::default().with_max_speakers(0).validate().is_err());
        assert!(ForumConfig::default().with_activation_threshold(1.5).validate().is_err());
        assert!(
            ForumConfig::default()
                .with_activation_threshold(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(
            ForumConfig::default()
                .with_failure_dormancy_threshold(0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: ForumConfig =
            serde_json::from_str(r#"{"mode": "debate", "hard_round_ceiling": 5}"#).unwrap();
        assert_eq!(config.mode, ForumMode::Debate);
        assert_eq!(config.hard_round_ceiling, 5);
        assert_eq!(config.max_speakers_per_round, 2);
    }
}
