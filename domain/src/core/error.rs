//! Domain error types

use crate::persona::PersonaId;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Participant already registered: {0}")]
    DuplicateParticipant(PersonaId),

    #[error("Unknown participant: {0}")]
    UnknownParticipant(PersonaId),

    #[error("Invalid persona id: {0:?}")]
    InvalidPersonaId(String),

    #[error("Turn content cannot be empty")]
    EmptyTurn,

    #[error("Invalid forum configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid transition: cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },

    #[error("Corrupt session snapshot: {0}")]
    CorruptSnapshot(String),
}

impl DomainError {
    /// Check if this error rejects an operation on a terminated or busy session
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, DomainError::InvalidTransition { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let error = DomainError::InvalidTransition {
            operation: "start a round",
            state: "terminated",
        };
        assert_eq!(
            error.to_string(),
            "Invalid transition: cannot start a round while terminated"
        );
        assert!(error.is_invalid_transition());
    }

    #[test]
    fn test_other_errors_are_not_transitions() {
        assert!(!DomainError::EmptyTurn.is_invalid_transition());
        assert!(
            !DomainError::UnknownParticipant(PersonaId::new_unchecked("kant"))
                .is_invalid_transition()
        );
    }
}
