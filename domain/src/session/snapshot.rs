//! Serializable session state for persistence and resumption

use super::state::{SchedulerState, TerminationReason};
use crate::conversation::Turn;
use crate::forum::{ForumConfig, ForumMode};
use crate::participant::ParticipantRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// First eight hex digits, enough to tell sessions apart in listings
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| format!("Invalid session id: {} ({})", s, e))
    }
}

/// Everything needed to resume a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub id: SessionId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub config: ForumConfig,
    /// Completed rounds
    pub round: u32,
    pub state: SchedulerState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination: Option<TerminationReason>,
    #[serde(default)]
    pub end_requested: bool,
    pub turns: Vec<Turn>,
    pub participants: Vec<ParticipantRecord>,
    #[serde(default)]
    pub last_cooldown_round: Option<u32>,
    /// Human turns submitted mid-round and not yet appended
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending_human_turns: Vec<String>,
}

impl SessionSnapshot {
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            title: self.title.clone(),
            mode: self.config.mode,
            round: self.round,
            turn_count: self.turns.len(),
            participants: self
                .participants
                .iter()
                .map(|r| r.profile.name.clone())
                .collect(),
            state: self.state,
            termination: self.termination,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Listing view of a stored session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub title: String,
    pub mode: ForumMode,
    pub round: u32,
    pub turn_count: usize,
    pub participants: Vec<String>,
    pub state: SchedulerState,
    pub termination: Option<TerminationReason>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_parse_and_display() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(id.short().len(), 8);
        assert!("not-a-uuid".parse::<SessionId>().is_err());
    }
}
