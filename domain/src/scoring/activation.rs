//! Activation scoring: how willing a persona is to speak this round.
//!
//! The score combines four signals, then applies the forum mode:
//!
//! 1. **Relevance**: overlap between recent turns and the persona's affinity tags
//! 2. **Baseline**: trait-derived willingness, raised by curiosity when a question is open
//! 3. **Monopoly penalty**: proportional to the consecutive-speaking count
//! 4. **Gates**: dormant or cooling-down personas always score 0
//!
//! | Mode        | Extra signal                                              |
//! |-------------|-----------------------------------------------------------|
//! | Consensus   | convergence: agreement markers, cross-speaker tag overlap |
//! | Debate      | contradiction of one of the persona's known positions     |
//! | Exploration | flattened towards a uniform, curiosity-driven score       |

use super::text::{AGREEMENT_MARKERS, CONTRADICTION_MARKERS, contains_any, is_open_question, tokenize};
use crate::conversation::Turn;
use crate::forum::ForumMode;
use crate::participant::ParticipantRecord;
use crate::persona::{PersonaProfile, TraitWeights};
use std::collections::HashSet;

/// Capability that turns a participant and the log tail into a score in `[0, 1]`.
///
/// Implementations must be pure: identical inputs give identical scores and
/// nothing is mutated.
pub trait ActivationScorer: Send + Sync {
    fn score(&self, record: &ParticipantRecord, tail: &[Turn], mode: ForumMode) -> f64;
}

/// Relative weights of the scoring signals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub relevance: f64,
    pub baseline: f64,
    pub mode_boost: f64,
    /// Added to baseline willingness, scaled by curiosity, when a question is open
    pub question_bonus: f64,
    /// Subtracted per consecutive turn without a human turn in between
    pub monopoly_penalty: f64,
    /// Score every persona receives in exploration mode before curiosity
    pub exploration_floor: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            relevance: 0.4,
            baseline: 0.35,
            mode_boost: 0.25,
            question_bonus: 0.3,
            monopoly_penalty: 0.15,
            exploration_floor: 0.4,
        }
    }
}

/// Default scorer driven by persona traits and topic affinity
#[derive(Debug, Clone, Default)]
pub struct TraitAffinityScorer {
    weights: ScoringWeights,
}

impl TraitAffinityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Willingness to speak from traits alone
    pub fn baseline(traits: &TraitWeights) -> f64 {
        0.5 * traits.assertiveness + 0.3 * traits.curiosity + 0.2 * (1.0 - traits.patience)
    }

    /// Fraction of affinity tags (up to three) mentioned in `tokens`
    fn relevance(profile: &PersonaProfile, tokens: &HashSet<String>) -> f64 {
        let tags = profile.affinity_keywords();
        if tags.is_empty() {
            return 0.0;
        }
        let matched = tags
            .iter()
            .filter(|keywords| keywords.iter().any(|k| tokens.contains(k)))
            .count();
        (matched as f64 / tags.len().min(3) as f64).min(1.0)
    }

    /// Another speaker rejected one of this persona's positions
    fn contradiction(profile: &PersonaProfile, others: &[(&Turn, HashSet<String>)]) -> f64 {
        let positions = profile.position_keywords();
        let challenged = others.iter().any(|(_, tokens)| {
            contains_any(tokens, CONTRADICTION_MARKERS)
                && (tokens.contains(profile.id.as_str())
                    || positions.iter().any(|p| tokens.contains(p)))
        });
        if challenged {
            0.5 + 0.5 * profile.traits.assertiveness
        } else {
            0.0
        }
    }

    /// Others are converging on topics this persona cares about
    fn convergence(profile: &PersonaProfile, others: &[(&Turn, HashSet<String>)]) -> f64 {
        let tags = profile.affinity_keywords();
        let agreement = others
            .iter()
            .any(|(_, tokens)| contains_any(tokens, AGREEMENT_MARKERS));
        let sharing_speakers: HashSet<String> = others
            .iter()
            .filter(|(_, tokens)| {
                tags.iter()
                    .any(|keywords| keywords.iter().any(|k| tokens.contains(k)))
            })
            .map(|(turn, _)| turn.speaker.to_string())
            .collect();

        let agreement_signal = if agreement { 0.5 } else { 0.0 };
        let overlap_signal = match sharing_speakers.len() {
            0 => 0.0,
            1 => 0.25,
            _ => 0.5,
        };
        profile.traits.agreeableness * (agreement_signal + overlap_signal)
    }
}

impl ActivationScorer for TraitAffinityScorer {
    fn score(&self, record: &ParticipantRecord, tail: &[Turn], mode: ForumMode) -> f64 {
        if record.dormant || record.is_cooling_down() {
            return 0.0;
        }
        let w = &self.weights;
        let profile = &record.profile;
        let traits = &profile.traits;
        let baseline = Self::baseline(traits);

        if tail.is_empty() {
            return baseline.clamp(0.0, 1.0);
        }

        let all_tokens: HashSet<String> = tail.iter().flat_map(|t| tokenize(&t.content)).collect();
        let others: Vec<(&Turn, HashSet<String>)> = tail
            .iter()
            .filter(|t| !t.is_from(&profile.id))
            .map(|t| (t, tokenize(&t.content)))
            .collect();

        let relevance = Self::relevance(profile, &all_tokens);
        let question_open = others
            .last()
            .is_some_and(|(turn, _)| is_open_question(&turn.content));
        let willingness = if question_open {
            (baseline + w.question_bonus * traits.curiosity).min(1.0)
        } else {
            baseline
        };

        let raw = match mode {
            ForumMode::Consensus => {
                w.relevance * relevance
                    + w.baseline * willingness
                    + w.mode_boost * Self::convergence(profile, &others)
            }
            ForumMode::Debate => {
                w.relevance * relevance
                    + w.baseline * willingness
                    + w.mode_boost * Self::contradiction(profile, &others)
            }
            ForumMode::Exploration => {
                let question = if question_open { 1.0 } else { 0.0 };
                w.exploration_floor
                    + (1.0 - w.exploration_floor)
                        * (0.4 * traits.curiosity + 0.35 * relevance + 0.25 * question)
            }
        };

        let penalty = w.monopoly_penalty * record.consecutive_speaking_count as f64;
        (raw - penalty).clamp(0.0, 1.0)
    }
}
