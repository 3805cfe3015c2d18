//! Speaker selection policy
//!
//! Turns the scored candidates of a round into the ordered list of personas
//! that will speak. The returned order is the order their turns are appended.

use crate::forum::ForumConfig;
use crate::participant::{ParticipantRecord, ParticipantRegistry};
use crate::persona::PersonaId;
use std::cmp::Ordering;

/// A persona together with its activation score for the current round
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub persona: PersonaId,
    pub score: f64,
}

impl ScoredCandidate {
    pub fn new(persona: PersonaId, score: f64) -> Self {
        Self { persona, score }
    }
}

/// Pick the speakers of `round` (1-based) from the scored candidates.
///
/// A candidate is eligible when its score is strictly above the activation
/// threshold, it is neither dormant nor cooling down, and (outside debate) its
/// speaking streak is below the monopoly limit. Personas who spoke in the
/// previous round are dropped, except in debate where one may speak again if no
/// other eligible persona outscores it.
///
/// Ordering: score descending, then longest wait, then persona id.
pub fn select_speakers(
    candidates: &[ScoredCandidate],
    registry: &ParticipantRegistry,
    config: &ForumConfig,
    round: u32,
) -> Vec<PersonaId> {
    let mut eligible: Vec<(&ScoredCandidate, &ParticipantRecord)> = candidates
        .iter()
        .filter(|c| c.score.is_finite() && c.score > config.activation_threshold)
        .filter_map(|c| registry.get(&c.persona).ok().map(|r| (c, r)))
        .filter(|(_, r)| !r.dormant && !r.is_cooling_down())
        .filter(|(_, r)| {
            !config.mode.enforces_monopoly_limit()
                || r.consecutive_speaking_count < config.monopoly_limit
        })
        .collect();

    let best_fresh_score = eligible
        .iter()
        .filter(|(_, r)| !r.spoke_in_previous_round(round))
        .map(|(c, _)| c.score)
        .fold(f64::NEG_INFINITY, f64::max);

    eligible.retain(|(c, r)| {
        if !r.spoke_in_previous_round(round) {
            return true;
        }
        config.mode.allows_consecutive_turns() && c.score >= best_fresh_score
    });

    eligible.sort_by(|(a, ra), (b, rb)| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| ra.wait_key().cmp(&rb.wait_key()))
            .then_with(|| compare_ids(&a.persona, &b.persona))
    });

    eligible
        .into_iter()
        .take(config.max_speakers_per_round)
        .map(|(c, _)| c.persona.clone())
        .collect()
}

fn compare_ids(a: &PersonaId, b: &PersonaId) -> Ordering {
    a.as_str().cmp(b.as_str())
}
