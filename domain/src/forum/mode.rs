//! Forum mode definitions.
//!
//! [`ForumMode`] is the session-wide policy that reweights activation
//! scoring and decides how strictly turn-taking is enforced:
//!
//! | Mode        | Scoring emphasis                    | Consecutive rounds | Monopoly limit |
//! |-------------|-------------------------------------|--------------------|----------------|
//! | Consensus   | convergent reasoning                | never              | enforced       |
//! | Debate      | rebuttal of contradicted positions  | when uncontested   | not enforced   |
//! | Exploration | uniform, curiosity driven           | never              | enforced       |

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForumMode {
    /// Seek common ground
    Consensus,
    /// Competitive argumentation
    Debate,
    /// Open inquiry
    #[default]
    Exploration,
}

impl ForumMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForumMode::Consensus => "consensus",
            ForumMode::Debate => "debate",
            ForumMode::Exploration => "exploration",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ForumMode::Consensus => "Consensus: personas look for common ground",
            ForumMode::Debate => "Debate: personas rebut positions they disagree with",
            ForumMode::Exploration => "Exploration: open, curiosity-driven inquiry",
        }
    }

    /// Whether a persona may speak in two consecutive rounds
    pub fn allows_consecutive_turns(&self) -> bool {
        matches!(self, ForumMode::Debate)
    }

    /// Whether the consecutive-speaking monopoly limit is a hard cap
    pub fn enforces_monopoly_limit(&self) -> bool {
        !matches!(self, ForumMode::Debate)
    }
}

impl fmt::Display for ForumMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ForumMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "consensus" | "c" => Ok(ForumMode::Consensus),
            "debate" | "d" => Ok(ForumMode::Debate),
            "exploration" | "explore" | "e" => Ok(ForumMode::Exploration),
            _ => Err(format!(
                "Invalid forum mode: {}. Valid: consensus, debate, exploration",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("debate".parse::<ForumMode>().unwrap(), ForumMode::Debate);
        assert_eq!("Consensus".parse::<ForumMode>().unwrap(), ForumMode::Consensus);
        assert_eq!("explore".parse::<ForumMode>().unwrap(), ForumMode::Exploration);
        assert!("chaos".parse::<ForumMode>().is_err());
    }

    #[test]
    fn test_only_debate_relaxes_turn_taking() {
        assert!(ForumMode::Debate.allows_consecutive_turns());
        assert!(!ForumMode::Consensus.allows_consecutive_turns());
        assert!(!ForumMode::Exploration.allows_consecutive_turns());

        assert!(!ForumMode::Debate.enforces_monopoly_limit());
        assert!(ForumMode::Consensus.enforces_monopoly_limit());
        assert!(ForumMode::Exploration.enforces_monopoly_limit());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&ForumMode::Debate).unwrap(),
            "\"debate\""
        );
        let mode: ForumMode = serde_json::from_str("\"consensus\"").unwrap();
        assert_eq!(mode, ForumMode::Consensus);
    }
}
