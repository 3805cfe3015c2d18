//! Activation scoring and speaker selection.

pub mod activation;
pub mod selection;
pub mod text;

pub use activation::{ActivationScorer, ScoringWeights, TraitAffinityScorer};
pub use selection::{ScoredCandidate, select_speakers};
