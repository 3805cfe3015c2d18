//! Participant registry
//!
//! Owns every [`ParticipantRecord`] of a session, in registration order.
//! Only the turn scheduler holds a mutable reference to it.

use super::record::ParticipantRecord;
use crate::core::error::DomainError;
use crate::persona::{PersonaId, PersonaProfile};

#[derive(Debug, Clone, Default)]
pub struct ParticipantRegistry {
    records: Vec<ParticipantRecord>,
    /// Round whose cooldown tick has already been applied
    last_cooldown_round: Option<u32>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted records, rejecting duplicate ids.
    pub fn from_records(
        records: Vec<ParticipantRecord>,
        last_cooldown_round: Option<u32>,
    ) -> Result<Self, DomainError> {
        let mut registry = Self::new();
        for record in records {
            registry.register(record)?;
        }
        registry.last_cooldown_round = last_cooldown_round;
        Ok(registry)
    }

    pub fn register(&mut self, record: ParticipantRecord) -> Result<(), DomainError> {
        if self.contains(record.id()) {
            return Err(DomainError::DuplicateParticipant(record.id().clone()));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn register_profile(&mut self, profile: PersonaProfile) -> Result<(), DomainError> {
        self.register(ParticipantRecord::new(profile))
    }

    pub fn contains(&self, id: &PersonaId) -> bool {
        self.records.iter().any(|r| r.id() == id)
    }

    pub fn get(&self, id: &PersonaId) -> Result<&ParticipantRecord, DomainError> {
        self.records
            .iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| DomainError::UnknownParticipant(id.clone()))
    }

    fn get_mut(&mut self, id: &PersonaId) -> Result<&mut ParticipantRecord, DomainError> {
        self.records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| DomainError::UnknownParticipant(id.clone()))
    }

    /// Bookkeeping after a persona's turn was appended in `round`
    pub fn apply_post_turn_update(
        &mut self,
        id: &PersonaId,
        round: u32,
        cooldown_rounds: u32,
    ) -> Result<(), DomainError> {
        let record = self.get_mut(id)?;
        record.consecutive_speaking_count += 1;
        record.cooldown_remaining = cooldown_rounds;
        record.last_spoke_round = Some(round);
        record.consecutive_failure_count = 0;
        Ok(())
    }

    /// Count a generation failure; returns `true` if this call made the persona dormant.
    pub fn record_failure(&mut self, id: &PersonaId, threshold: u32) -> Result<bool, DomainError> {
        let record = self.get_mut(id)?;
        record.consecutive_failure_count += 1;
        if !record.dormant && record.consecutive_failure_count >= threshold {
            record.dormant = true;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn mark_dormant(&mut self, id: &PersonaId) -> Result<(), DomainError> {
        self.get_mut(id)?.dormant = true;
        Ok(())
    }

    /// Decrement every cooldown by one, at most once per round.
    ///
    /// Returns `false` when the tick for `round` was already applied.
    pub fn reset_cooldowns(&mut self, round: u32) -> bool {
        if matches!(self.last_cooldown_round, Some(done) if done >= round) {
            return false;
        }
        for record in &mut self.records {
            record.cooldown_remaining = record.cooldown_remaining.saturating_sub(1);
        }
        self.last_cooldown_round = Some(round);
        true
    }

    /// A human turn ends every persona's speaking streak.
    pub fn reset_consecutive_counts(&mut self) {
        for record in &mut self.records {
            record.consecutive_speaking_count = 0;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipantRecord> {
        self.records.iter()
    }

    /// Non-dormant participants, in registration order
    pub fn active(&self) -> impl Iterator<Item = &ParticipantRecord> {
        self.records.iter().filter(|r| !r.dormant)
    }

    pub fn records(&self) -> &[ParticipantRecord] {
        &self.records
    }

    pub fn last_cooldown_round(&self) -> Option<u32> {
        self.last_cooldown_round
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::PersonaPreset;

    fn registry() -> ParticipantRegistry {
        let mut registry = ParticipantRegistry::new();
        registry
            .register_profile(PersonaPreset::Socrates.profile())
            .unwrap();
        registry
            .register_profile(PersonaPreset::Kant.profile())
            .unwrap();
        registry
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = registry();
        let err = registry
            .register_profile(PersonaPreset::Kant.profile())
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicateParticipant(PersonaPreset::Kant.id()));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unknown_participant() {
        let registry = registry();
        let id = PersonaPreset::Confucius.id();
        assert_eq!(
            registry.get(&id).unwrap_err(),
            DomainError::UnknownParticipant(id)
        );
    }

    #[test]
    fn test_post_turn_update() {
        let mut registry = registry();
        let id = PersonaPreset::Socrates.id();
        registry.record_failure(&id, 3).unwrap();
        registry.apply_post_turn_update(&id, 4, 2).unwrap();

        let record = registry.get(&id).unwrap();
        assert_eq!(record.consecutive_speaking_count, 1);
        assert_eq!(record.cooldown_remaining, 2);
        assert_eq!(record.last_spoke_round, Some(4));
        assert_eq!(record.consecutive_failure_count, 0);
    }

    #[test]
    fn test_cooldown_ticks_once_per_round_for_everyone() {
        let mut registry = registry();
        let socrates = PersonaPreset::Socrates.id();
        let kant = PersonaPreset::Kant.id();
        registry.apply_post_turn_update(&socrates, 1, 2).unwrap();
        registry.apply_post_turn_update(&kant, 1, 1).unwrap();

        assert!(registry.reset_cooldowns(2));
        assert!(!registry.reset_cooldowns(2));
        assert_eq!(registry.get(&socrates).unwrap().cooldown_remaining, 1);
        assert_eq!(registry.get(&kant).unwrap().cooldown_remaining, 0);

        assert!(registry.reset_cooldowns(3));
        assert_eq!(registry.get(&socrates).unwrap().cooldown_remaining, 0);
        // Saturates at zero
        assert!(registry.reset_cooldowns(4));
        assert_eq!(registry.get(&kant).unwrap().cooldown_remaining, 0);
    }

    #[test]
    fn test_dormant_after_threshold_failures() {
        let mut registry = registry();
        let id = PersonaPreset::Kant.id();
        assert!(!registry.record_failure(&id, 3).unwrap());
        assert!(!registry.record_failure(&id, 3).unwrap());
        assert!(registry.record_failure(&id, 3).unwrap());
        // Already dormant: not reported twice
        assert!(!registry.record_failure(&id, 3).unwrap());

        let active: Vec<&str> = registry.active().map(|r| r.id().as_str()).collect();
        assert_eq!(active, vec!["socrates"]);
    }

    #[test]
    fn test_human_turn_resets_streaks() {
        let mut registry = registry();
        let id = PersonaPreset::Socrates.id();
        registry.apply_post_turn_update(&id, 1, 0).unwrap();
        registry.apply_post_turn_update(&id, 2, 0).unwrap();
        assert_eq!(registry.get(&id).unwrap().consecutive_speaking_count, 2);

        registry.reset_consecutive_counts();
        assert_eq!(registry.get(&id).unwrap().consecutive_speaking_count, 0);
    }

    #[test]
    fn test_from_records_rejects_duplicates() {
        let records = vec![
            ParticipantRecord::new(PersonaPreset::Plato.profile()),
            ParticipantRecord::new(PersonaPreset::Plato.profile()),
        ];
        assert!(ParticipantRegistry::from_records(records, None).is_err());
    }
}
