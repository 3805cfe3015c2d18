//! Persona value objects

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a persona taking part in a forum (Value Object)
///
/// Always lowercase and free of whitespace, so `"Socrates"` and
/// `" socrates "` name the same participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonaId(String);

impl PersonaId {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidPersonaId(raw));
        }
        Ok(Self(normalized))
    }

    /// Build an id from a literal that is already normalized.
    pub(crate) fn new_unchecked(raw: &str) -> Self {
        Self(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PersonaId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PersonaId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PersonaId> for String {
    fn from(id: PersonaId) -> Self {
        id.0
    }
}

/// Fixed personality weights of a persona, each within `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitWeights {
    /// Drive to ask and follow up on open questions
    pub curiosity: f64,
    /// Willingness to take the floor uninvited
    pub assertiveness: f64,
    /// Tolerance for letting others speak first
    pub patience: f64,
    /// Inclination towards common ground rather than rebuttal
    pub agreeableness: f64,
}

impl TraitWeights {
    pub fn new(curiosity: f64, assertiveness: f64, patience: f64, agreeableness: f64) -> Self {
        Self {
            curiosity,
            assertiveness,
            patience,
            agreeableness,
        }
        .clamped()
    }

    /// Clamp every weight into `[0, 1]`; NaN collapses to the neutral 0.5.
    pub fn clamped(self) -> Self {
        fn clamp(v: f64) -> f64 {
            if v.is_nan() { 0.5 } else { v.clamp(0.0, 1.0) }
        }
        Self {
            curiosity: clamp(self.curiosity),
            assertiveness: clamp(self.assertiveness),
            patience: clamp(self.patience),
            agreeableness: clamp(self.agreeableness),
        }
    }
}

impl Default for TraitWeights {
    fn default() -> Self {
        Self::new(0.5, 0.5, 0.5, 0.5)
    }
}

/// Opaque reference to a persona's long-term memory.
///
/// Resolved by an external collaborator and passed through to the
/// response generator untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryHandle(String);

impl MemoryHandle {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_id_normalizes_case_and_whitespace() {
        let id = PersonaId::new("  Socrates ").unwrap();
        assert_eq!(id.as_str(), "socrates");
        assert_eq!(id, "SOCRATES".parse().unwrap());
    }

    #[test]
    fn test_persona_id_rejects_empty_and_inner_whitespace() {
        assert!(PersonaId::new("   ").is_err());
        assert!(PersonaId::new("marcus aurelius").is_err());
    }

    #[test]
    fn test_persona_id_serde_validates() {
        let id: PersonaId = serde_json::from_str("\"Kant\"").unwrap();
        assert_eq!(id.as_str(), "kant");
        assert!(serde_json::from_str::<PersonaId>("\"\"").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"kant\"");
    }

    #[test]
    fn test_trait_weights_are_clamped() {
        let traits = TraitWeights::new(1.7, -0.2, f64::NAN, 0.4);
        assert_eq!(traits.curiosity, 1.0);
        assert_eq!(traits.assertiveness, 0.0);
        assert_eq!(traits.patience, 0.5);
        assert_eq!(traits.agreeableness, 0.4);
    }
}
