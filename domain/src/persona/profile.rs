//! Persona profile entity

use super::value_objects::{PersonaId, TraitWeights};
use serde::{Deserialize, Serialize};

/// Static description of a persona, fixed at persona creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaProfile {
    pub id: PersonaId,
    /// Display name ("Friedrich Nietzsche")
    pub name: String,
    pub traits: TraitWeights,
    /// Topics the persona is drawn to ("ethics", "moral_philosophy", ...)
    pub affinity_tags: Vec<String>,
    /// Ideas the persona is known to defend; challenged ideas provoke rebuttals in debate
    #[serde(default)]
    pub position_terms: Vec<String>,
    /// One-line description used when prompting a generator
    #[serde(default)]
    pub description: String,
}

impl PersonaProfile {
    pub fn new(id: PersonaId, name: impl Into<String>, traits: TraitWeights) -> Self {
        Self {
            id,
            name: name.into(),
            traits: traits.clamped(),
            affinity_tags: Vec::new(),
            position_terms: Vec::new(),
            description: String::new(),
        }
    }

    pub fn with_affinity_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affinity_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_position_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.position_terms = terms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Lowercased keywords of the affinity tags (`"moral_philosophy"` → `moral`, `philosophy`)
    pub fn affinity_keywords(&self) -> Vec<Vec<String>> {
        self.affinity_tags.iter().map(|t| split_keywords(t)).collect()
    }

    /// Lowercased keywords of every known position
    pub fn position_keywords(&self) -> Vec<String> {
        self.position_terms
            .iter()
            .flat_map(|t| split_keywords(t))
            .collect()
    }
}

fn split_keywords(tag: &str) -> Vec<String> {
    tag.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(str::to_lowercase)
        .collect()
}
