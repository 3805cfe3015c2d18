//! Persona line-up from TOML (`[participants]` section)
//!
//! ```toml
//! [participants]
//! presets = ["socrates", "kant"]
//!
//! [participants.memory]
//! kant = "notes/kant.md"
//!
//! [[participants.custom]]
//! id = "hume"
//! name = "David Hume"
//! curiosity = 0.8
//! assertiveness = 0.5
//! affinity_tags = ["epistemology", "causation"]
//! ```

use forum_domain::{PersonaId, PersonaPreset, PersonaProfile, TraitWeights};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A persona defined entirely in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCustomPersona {
    pub id: String,
    pub name: String,
    pub curiosity: f64,
    pub assertiveness: f64,
    pub patience: f64,
    pub agreeableness: f64,
    pub affinity_tags: Vec<String>,
    pub position_terms: Vec<String>,
    pub description: String,
}

impl Default for FileCustomPersona {
    fn default() -> Self {
        let traits = TraitWeights::default();
        Self {
            id: String::new(),
            name: String::new(),
            curiosity: traits.curiosity,
            assertiveness: traits.assertiveness,
            patience: traits.patience,
            agreeableness: traits.agreeableness,
            affinity_tags: Vec::new(),
            position_terms: Vec::new(),
            description: String::new(),
        }
    }
}

impl FileCustomPersona {
    pub fn to_profile(&self) -> Result<PersonaProfile, String> {
        let id = PersonaId::new(self.id.as_str()).map_err(|e| e.to_string())?;
        let name = if self.name.trim().is_empty() {
            self.id.trim().to_string()
        } else {
            self.name.clone()
        };
        Ok(PersonaProfile::new(
            id,
            name,
            TraitWeights::new(
                self.curiosity,
                self.assertiveness,
                self.patience,
                self.agreeableness,
            ),
        )
        .with_affinity_tags(self.affinity_tags.iter().cloned())
        .with_position_terms(self.position_terms.iter().cloned())
        .with_description(self.description.clone()))
    }
}

/// Raw participants configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileParticipantsConfig {
    /// Built-in personas by id
    pub presets: Vec<String>,
    /// Personas defined inline
    pub custom: Vec<FileCustomPersona>,
    /// Memory references keyed by persona id
    pub memory: BTreeMap<String, String>,
}

impl Default for FileParticipantsConfig {
    fn default() -> Self {
        Self {
            presets: PersonaPreset::default_lineup()
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            custom: Vec::new(),
            memory: BTreeMap::new(),
        }
    }
}

impl FileParticipantsConfig {
    /// Resolve presets first, then custom personas, in file order
    pub fn to_profiles(&self) -> Result<Vec<PersonaProfile>, String> {
        let mut profiles = Vec::with_capacity(self.presets.len() + self.custom.len());
        for name in &self.presets {
            let preset: PersonaPreset = name.parse()?;
            profiles.push(preset.profile());
        }
        for custom in &self.custom {
            profiles.push(custom.to_profile()?);
        }
        Ok(profiles)
    }

    /// Keep only the listed personas (e.g. from `--persona`).
    ///
    /// Ids matching a custom persona keep that definition; every other id
    /// is treated as a preset name.
    pub fn restrict_to(&mut self, ids: &[String]) {
        let wanted: Vec<String> = ids.iter().map(|id| id.trim().to_lowercase()).collect();
        self.custom
            .retain(|custom| wanted.contains(&custom.id.trim().to_lowercase()));
        self.presets = wanted
            .into_iter()
            .filter(|id| {
                !self
                    .custom
                    .iter()
                    .any(|custom| custom.id.trim().to_lowercase() == *id)
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lineup() {
        let profiles = FileParticipantsConfig::default().to_profiles().unwrap();
        let ids: Vec<_> = profiles.iter().map(|p| p.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["socrates", "aristotle", "nietzsche"]);
    }

    #[test]
    fn test_custom_persona_from_toml() {
        let config: FileParticipantsConfig = toml::from_str(
            r#"
presets = ["kant"]

[[custom]]
id = "Hume"
name = "David Hume"
curiosity = 0.8
affinity_tags = ["epistemology", "causation"]
"#,
        )
        .unwrap();

        let profiles = config.to_profiles().unwrap();
        assert_eq!(profiles.len(), 2);
        let hume = &profiles[1];
        assert_eq!(hume.id.as_str(), "hume");
        assert_eq!(hume.name, "David Hume");
        assert_eq!(hume.traits.curiosity, 0.8);
        assert_eq!(hume.traits.patience, 0.5);
        assert_eq!(hume.affinity_tags, vec!["epistemology", "causation"]);
    }

    #[test]
    fn test_unknown_preset_is_rejected() {
        let config = FileParticipantsConfig {
            presets: vec!["hume".to_string()],
            ..Default::default()
        };
        assert!(config.to_profiles().unwrap_err().contains("Unknown persona"));
    }

    #[test]
    fn test_restrict_to_keeps_listed_personas() {
        let mut config = FileParticipantsConfig {
            custom: vec![
                FileCustomPersona {
                    id: "hume".to_string(),
                    ..Default::default()
                },
                FileCustomPersona {
                    id: "zeno".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        config.restrict_to(&["Kant".to_string(), "hume".to_string()]);

        assert_eq!(config.presets, vec!["kant"]);
        assert_eq!(config.custom.len(), 1);
        let ids: Vec<_> = config
            .to_profiles()
            .unwrap()
            .iter()
            .map(|p| p.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["kant", "hume"]);
    }

    #[test]
    fn test_custom_name_falls_back_to_id() {
        let persona = FileCustomPersona {
            id: "zeno".to_string(),
            ..Default::default()
        };
        assert_eq!(persona.to_profile().unwrap().name, "zeno");
    }
}
