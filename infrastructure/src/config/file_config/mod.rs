//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod forum;
mod generator;
mod logging;
mod participants;
mod repl;
mod session;

pub use forum::FileForumConfig;
pub use generator::{FileGeneratorConfig, GeneratorProvider};
pub use logging::FileLoggingConfig;
pub use participants::{FileCustomPersona, FileParticipantsConfig};
pub use repl::FileReplConfig;
pub use session::FileSessionConfig;

use forum_application::StaticPersonaMemory;
use forum_domain::{MemoryHandle, PersonaId, PersonaProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("forum.hard_round_ceiling cannot be 0")]
    ZeroCeiling,

    #[error("forum.max_speakers_per_round cannot be 0")]
    ZeroMaxSpeakers,

    #[error("forum.activation_threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f64),

    #[error("forum.failure_dormancy_threshold cannot be 0")]
    ZeroDormancyThreshold,

    #[error("forum.monopoly_limit cannot be 0")]
    ZeroMonopolyLimit,

    #[error("forum.context_window cannot be 0")]
    ZeroContextWindow,

    #[error("persona id cannot be empty")]
    EmptyPersonaId,

    #[error("invalid participant: {0}")]
    InvalidParticipant(String),

    #[error("participant listed twice: {0}")]
    DuplicateParticipant(String),

    #[error("at least one participant is required")]
    NoParticipants,

    #[error("generator.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("generator.model cannot be empty")]
    EmptyModelName,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Turn-taking rules
    pub forum: FileForumConfig,
    /// Persona line-up
    pub participants: FileParticipantsConfig,
    /// Response generator adapter
    pub generator: FileGeneratorConfig,
    /// Persistence and pacing
    pub session: FileSessionConfig,
    /// Log files
    pub logging: FileLoggingConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the entire configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let forum = &self.forum;
        if forum.hard_round_ceiling == 0 {
            return Err(ConfigValidationError::ZeroCeiling);
        }
        if forum.max_speakers_per_round == 0 {
            return Err(ConfigValidationError::ZeroMaxSpeakers);
        }
        if !(0.0..=1.0).contains(&forum.activation_threshold) {
            return Err(ConfigValidationError::ThresholdOutOfRange(
                forum.activation_threshold,
            ));
        }
        if forum.failure_dormancy_threshold == 0 {
            return Err(ConfigValidationError::ZeroDormancyThreshold);
        }
        if forum.monopoly_limit == 0 {
            return Err(ConfigValidationError::ZeroMonopolyLimit);
        }
        if forum.context_window == 0 {
            return Err(ConfigValidationError::ZeroContextWindow);
        }

        let empty_id = self
            .participants
            .presets
            .iter()
            .chain(self.participants.custom.iter().map(|c| &c.id))
            .any(|id| id.trim().is_empty());
        if empty_id {
            return Err(ConfigValidationError::EmptyPersonaId);
        }
        let profiles = self
            .participants
            .to_profiles()
            .map_err(ConfigValidationError::InvalidParticipant)?;
        if profiles.is_empty() {
            return Err(ConfigValidationError::NoParticipants);
        }
        let mut seen = HashSet::new();
        for profile in &profiles {
            if !seen.insert(profile.id.clone()) {
                return Err(ConfigValidationError::DuplicateParticipant(
                    profile.id.to_string(),
                ));
            }
        }

        if self.generator.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.generator.provider == GeneratorProvider::Openai
            && self.generator.model.trim().is_empty()
        {
            return Err(ConfigValidationError::EmptyModelName);
        }
        Ok(())
    }

    /// Persona profiles for a new session
    pub fn participant_profiles(&self) -> Result<Vec<PersonaProfile>, ConfigValidationError> {
        self.participants
            .to_profiles()
            .map_err(ConfigValidationError::InvalidParticipant)
    }

    /// Memory handles from `[participants.memory]`; unparseable ids are skipped
    pub fn persona_memory(&self) -> StaticPersonaMemory {
        self.participants
            .memory
            .iter()
            .filter_map(|(id, handle)| {
                PersonaId::new(id.as_str())
                    .ok()
                    .map(|id| (id, MemoryHandle::new(handle.clone())))
            })
            .fold(StaticPersonaMemory::new(), |memory, (id, handle)| {
                memory.with_handle(id, handle)
            })
    }
}
