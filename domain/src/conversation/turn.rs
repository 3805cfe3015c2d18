//! Turn entity: one produced utterance in the forum

use crate::persona::PersonaId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a turn
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Speaker {
    Human,
    Persona(PersonaId),
    System,
}

impl Speaker {
    pub fn is_human(&self) -> bool {
        matches!(self, Speaker::Human)
    }

    pub fn persona(&self) -> Option<&PersonaId> {
        match self {
            Speaker::Persona(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::Human => f.write_str("human"),
            Speaker::Persona(id) => write!(f, "{}", id),
            Speaker::System => f.write_str("system"),
        }
    }
}

/// A turn waiting to be appended; the log assigns sequence and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTurn {
    pub speaker: Speaker,
    pub content: String,
    pub thinking: Option<String>,
    pub round: u32,
}

impl NewTurn {
    pub fn human(content: impl Into<String>, round: u32) -> Self {
        Self {
            speaker: Speaker::Human,
            content: content.into(),
            thinking: None,
            round,
        }
    }

    pub fn persona(id: PersonaId, content: impl Into<String>, round: u32) -> Self {
        Self {
            speaker: Speaker::Persona(id),
            content: content.into(),
            thinking: None,
            round,
        }
    }

    pub fn with_thinking(mut self, thinking: Option<String>) -> Self {
        self.thinking = thinking.filter(|t| !t.trim().is_empty());
        self
    }
}

/// An appended, immutable turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub sequence: u64,
    pub speaker: Speaker,
    pub content: String,
    /// Internal reasoning of the speaker; never shown to other personas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    pub round: u32,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn is_from(&self, id: &PersonaId) -> bool {
        self.speaker.persona() == Some(id)
    }

    /// This turn as `viewer` may see it: another speaker's reasoning is withheld
    pub fn visible_to(&self, viewer: &PersonaId) -> Turn {
        let mut turn = self.clone();
        if !self.is_from(viewer) {
            turn.thinking = None;
        }
        turn
    }

    /// Single-line preview of the content, cut at a character boundary
    pub fn preview(&self, max_chars: usize) -> String {
        let flat = self.content.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() <= max_chars {
            return flat;
        }
        let cut: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(content: &str) -> Turn {
        Turn {
            sequence: 1,
            speaker: Speaker::Human,
            content: content.to_string(),
            thinking: None,
            round: 1,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_preview_flattens_and_cuts() {
        let t = turn("What is\n\njustice,   really?");
        assert_eq!(t.preview(100), "What is justice, really?");
        assert_eq!(t.preview(10), "What is...");
    }

    #[test]
    fn test_preview_respects_multibyte_chars() {
        let t = turn("Übermensch über alles");
        assert_eq!(t.preview(8), "Überm...");
    }

    #[test]
    fn test_blank_thinking_is_dropped() {
        let id = PersonaId::new("plato").unwrap();
        let draft = NewTurn::persona(id, "Forms.", 2).with_thinking(Some("  ".to_string()));
        assert!(draft.thinking.is_none());
    }

    #[test]
    fn test_reasoning_visible_only_to_its_speaker() {
        let plato = PersonaId::new("plato").unwrap();
        let kant = PersonaId::new("kant").unwrap();
        let t = Turn {
            speaker: Speaker::Persona(plato.clone()),
            thinking: Some("the cave again".to_string()),
            ..turn("Forms are real.")
        };

        assert_eq!(t.visible_to(&plato).thinking.as_deref(), Some("the cave again"));
        let seen_by_kant = t.visible_to(&kant);
        assert_eq!(seen_by_kant.thinking, None);
        assert_eq!(seen_by_kant.content, "Forms are real.");
    }

    #[test]
    fn test_speaker_serde_shape() {
        let speaker = Speaker::Persona(PersonaId::new("kant").unwrap());
        let json = serde_json::to_value(&speaker).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "persona", "id": "kant"}));
        let human = serde_json::to_value(Speaker::Human).unwrap();
        assert_eq!(human, serde_json::json!({"kind": "human"}));
    }
}
