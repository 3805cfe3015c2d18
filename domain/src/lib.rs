//! Domain layer for philosopher-forum
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Forum
//!
//! A forum is a conversation between one human and several philosopher
//! personas. Each round, every persona is scored for how much it wants to
//! speak; the highest scorers above a threshold take a turn.
//!
//! - **Persona**: a philosopher with traits and topics it is drawn to
//! - **Participant**: the runtime state of a persona within one session
//! - **Conversation log**: the append-only record of turns
//! - **Forum mode**: consensus, debate or exploration
//!
//! ## Termination
//!
//! A session always ends: the hard round ceiling is checked before any
//! other condition, and an autonomous session with nobody left to speak
//! terminates as stalled.

pub mod conversation;
pub mod core;
pub mod forum;
pub mod participant;
pub mod persona;
pub mod scoring;
pub mod session;

// Re-export commonly used types
pub use conversation::{ConversationLog, NewTurn, Speaker, Turn};
pub use core::error::DomainError;
pub use forum::{ForumConfig, ForumMode};
pub use participant::{ParticipantRecord, ParticipantRegistry};
pub use persona::{MemoryHandle, PersonaId, PersonaPreset, PersonaProfile, TraitWeights};
pub use scoring::{
    ActivationScorer, ScoredCandidate, ScoringWeights, TraitAffinityScorer, select_speakers,
};
pub use session::{
    ForumSession, SNAPSHOT_VERSION, SchedulerState, SessionId, SessionSnapshot, SessionSummary,
    TerminationReason,
};
