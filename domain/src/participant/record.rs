//! Participant record: per-persona runtime state within one session

use crate::persona::{PersonaId, PersonaProfile};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub profile: PersonaProfile,
    /// Turns spoken since the last human turn
    pub consecutive_speaking_count: u32,
    /// Rounds left before the persona is eligible again
    pub cooldown_remaining: u32,
    /// Generation failures in a row; reset by a successful turn
    pub consecutive_failure_count: u32,
    /// Permanently excluded from selection for the rest of the session
    pub dormant: bool,
    /// Round of the last appended turn; `None` if the persona never spoke
    pub last_spoke_round: Option<u32>,
}

impl ParticipantRecord {
    pub fn new(profile: PersonaProfile) -> Self {
        Self {
            profile,
            consecutive_speaking_count: 0,
            cooldown_remaining: 0,
            consecutive_failure_count: 0,
            dormant: false,
            last_spoke_round: None,
        }
    }

    pub fn id(&self) -> &PersonaId {
        &self.profile.id
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_remaining > 0
    }

    /// Whether the persona spoke in the round immediately before `round`
    pub fn spoke_in_previous_round(&self, round: u32) -> bool {
        matches!(self.last_spoke_round, Some(last) if last + 1 == round)
    }

    /// Sort key for "waited longest": never spoken sorts first
    pub fn wait_key(&self) -> u32 {
        self.last_spoke_round.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::PersonaPreset;

    #[test]
    fn test_new_record_is_fresh() {
        let record = ParticipantRecord::new(PersonaPreset::Kant.profile());
        assert_eq!(record.id().as_str(), "kant");
        assert!(!record.dormant);
        assert!(!record.is_cooling_down());
        assert_eq!(record.wait_key(), 0);
    }

    #[test]
    fn test_spoke_in_previous_round() {
        let mut record = ParticipantRecord::new(PersonaPreset::Plato.profile());
        record.last_spoke_round = Some(4);
        assert!(record.spoke_in_previous_round(5));
        assert!(!record.spoke_in_previous_round(6));
        assert!(!record.spoke_in_previous_round(4));
    }
}
