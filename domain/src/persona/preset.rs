//! Built-in persona presets
//!
//! The closed set of philosophers shipped with the forum. Custom personas
//! can still be supplied as plain [`PersonaProfile`] values.

use super::profile::PersonaProfile;
use super::value_objects::{PersonaId, TraitWeights};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaPreset {
    Socrates,
    Aristotle,
    Plato,
    Kant,
    Nietzsche,
    Confucius,
}

impl PersonaPreset {
    pub const ALL: [PersonaPreset; 6] = [
        PersonaPreset::Socrates,
        PersonaPreset::Aristotle,
        PersonaPreset::Plato,
        PersonaPreset::Kant,
        PersonaPreset::Nietzsche,
        PersonaPreset::Confucius,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaPreset::Socrates => "socrates",
            PersonaPreset::Aristotle => "aristotle",
            PersonaPreset::Plato => "plato",
            PersonaPreset::Kant => "kant",
            PersonaPreset::Nietzsche => "nietzsche",
            PersonaPreset::Confucius => "confucius",
        }
    }

    /// Default line-up for a new forum
    pub fn default_lineup() -> Vec<PersonaPreset> {
        vec![
            PersonaPreset::Socrates,
            PersonaPreset::Aristotle,
            PersonaPreset::Nietzsche,
        ]
    }

    pub fn id(&self) -> PersonaId {
        PersonaId::new_unchecked(self.as_str())
    }

    pub fn profile(&self) -> PersonaProfile {
        match self {
            PersonaPreset::Socrates => PersonaProfile::new(
                self.id(),
                "Socrates",
                TraitWeights::new(0.95, 0.8, 0.6, 0.6),
            )
            .with_affinity_tags([
                "ethics",
                "moral_philosophy",
                "virtue",
                "knowledge",
                "justice",
                "courage",
                "wisdom",
                "self_knowledge",
            ])
            .with_position_terms(["examined life", "virtue is knowledge", "knowing nothing"])
            .with_description("The gadfly of Athens, who questions every assumption"),
            PersonaPreset::Aristotle => PersonaProfile::new(
                self.id(),
                "Aristotle",
                TraitWeights::new(0.8, 0.6, 0.7, 0.5),
            )
            .with_affinity_tags([
                "logic",
                "ethics",
                "politics",
                "natural_philosophy",
                "metaphysics",
            ])
            .with_position_terms([
                "virtue ethics",
                "golden mean",
                "practical wisdom",
                "four causes",
                "substance",
            ])
            .with_description("The systematic observer who categorizes before he concludes"),
            PersonaPreset::Plato => PersonaProfile::new(
                self.id(),
                "Plato",
                TraitWeights::new(0.7, 0.6, 0.6, 0.5),
            )
            .with_affinity_tags([
                "metaphysics",
                "epistemology",
                "political_philosophy",
                "ethics",
                "mathematics",
            ])
            .with_position_terms([
                "theory of forms",
                "philosopher kings",
                "tripartite soul",
                "allegory of the cave",
            ])
            .with_description("The idealist who looks past appearances to eternal forms"),
            PersonaPreset::Kant => PersonaProfile::new(
                self.id(),
                "Immanuel Kant",
                TraitWeights::new(0.6, 0.7, 0.8, 0.4),
            )
            .with_affinity_tags([
                "moral_philosophy",
                "epistemology",
                "metaphysics",
                "aesthetics",
                "duty",
            ])
            .with_position_terms([
                "categorical imperative",
                "transcendental idealism",
                "synthetic a priori",
                "good will",
            ])
            .with_description("The rigorous moralist who demands universal principles"),
            PersonaPreset::Nietzsche => PersonaProfile::new(
                self.id(),
                "Friedrich Nietzsche",
                TraitWeights::new(0.7, 0.9, 0.2, 0.1),
            )
            .with_affinity_tags([
                "existentialism",
                "morality",
                "culture",
                "psychology",
                "aesthetics",
            ])
            .with_position_terms([
                "will to power",
                "eternal recurrence",
                "overman",
                "master morality",
                "perspectivism",
            ])
            .with_description("The provocateur who challenges every inherited value"),
            PersonaPreset::Confucius => PersonaProfile::new(
                self.id(),
                "Confucius",
                TraitWeights::new(0.5, 0.4, 0.9, 0.9),
            )
            .with_affinity_tags([
                "ethics",
                "politics",
                "social_philosophy",
                "education",
                "virtue",
            ])
            .with_position_terms([
                "benevolence",
                "ritual propriety",
                "exemplary person",
                "rectification of names",
                "social harmony",
            ])
            .with_description("The teacher of harmony, propriety and moral cultivation"),
        }
    }
}

impl fmt::Display for PersonaPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PersonaPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        PersonaPreset::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| {
                format!(
                    "Unknown persona: {}. Valid: {}",
                    s,
                    PersonaPreset::ALL.map(|p| p.as_str()).join(", ")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_parses_from_its_id() {
        for preset in PersonaPreset::ALL {
            let parsed: PersonaPreset = preset.as_str().parse().unwrap();
            assert_eq!(parsed, preset);
            assert_eq!(preset.profile().id, preset.id());
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "Nietzsche".parse::<PersonaPreset>().unwrap(),
            PersonaPreset::Nietzsche
        );
        assert!("hume".parse::<PersonaPreset>().is_err());
    }

    #[test]
    fn test_profiles_have_tags_and_bounded_traits() {
        for preset in PersonaPreset::ALL {
            let profile = preset.profile();
            assert!(!profile.affinity_tags.is_empty());
            assert!(!profile.position_terms.is_empty());
            for w in [
                profile.traits.curiosity,
                profile.traits.assertiveness,
                profile.traits.patience,
                profile.traits.agreeableness,
            ] {
                assert!((0.0..=1.0).contains(&w));
            }
        }
    }
}
