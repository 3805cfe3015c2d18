//! Forum rules from TOML (`[forum]` section)

use forum_domain::{ForumConfig, ForumMode};
use serde::{Deserialize, Serialize};

/// Raw forum configuration from TOML
///
/// ```toml
/// [forum]
/// mode = "debate"
/// max_speakers_per_round = 2
/// hard_round_ceiling = 20
/// activation_threshold = 0.5
/// autonomous = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileForumConfig {
    pub mode: ForumMode,
    pub max_speakers_per_round: usize,
    pub hard_round_ceiling: u32,
    pub activation_threshold: f64,
    pub failure_dormancy_threshold: u32,
    pub cooldown_rounds: u32,
    pub monopoly_limit: u32,
    pub context_window: usize,
    pub scoring_window: usize,
    pub autonomous: bool,
}

impl Default for FileForumConfig {
    fn default() -> Self {
        let defaults = ForumConfig::default();
        Self {
            mode: defaults.mode,
            max_speakers_per_round: defaults.max_speakers_per_round,
            hard_round_ceiling: defaults.hard_round_ceiling,
            activation_threshold: defaults.activation_threshold,
            failure_dormancy_threshold: defaults.failure_dormancy_threshold,
            cooldown_rounds: defaults.cooldown_rounds,
            monopoly_limit: defaults.monopoly_limit,
            context_window: defaults.context_window,
            scoring_window: defaults.scoring_window,
            autonomous: defaults.autonomous,
        }
    }
}

impl FileForumConfig {
    /// Convert to the session-scoped domain configuration
    pub fn to_forum_config(&self) -> ForumConfig {
        ForumConfig::new(self.mode)
            .with_max_speakers(self.max_speakers_per_round)
            .with_hard_round_ceiling(self.hard_round_ceiling)
            .with_activation_threshold(self.activation_threshold)
            .with_failure_dormancy_threshold(self.failure_dormancy_threshold)
            .with_cooldown_rounds(self.cooldown_rounds)
            .with_monopoly_limit(self.monopoly_limit)
            .with_context_window(self.context_window)
            .with_scoring_window(self.scoring_window)
            .with_autonomous(self.autonomous)
    }
}
