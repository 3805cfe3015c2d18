//! Response Generator port
//!
//! Defines the interface for producing a persona's next turn. The scheduler
//! treats it as an opaque, possibly slow and possibly failing capability.

use async_trait::async_trait;
use forum_domain::{ForumMode, MemoryHandle, PersonaProfile, Turn};
use thiserror::Error;

/// Errors that can occur while generating a response
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Generator unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Generator returned an empty response")]
    EmptyResponse,

    #[error("Other error: {0}")]
    Other(String),
}

/// Bounded context handed to a generator: the most recent turns and the
/// persona's memory reference, if any.
#[derive(Debug, Clone, Default)]
pub struct ContextWindow {
    pub turns: Vec<Turn>,
    pub memory: Option<MemoryHandle>,
}

impl ContextWindow {
    pub fn new(turns: Vec<Turn>) -> Self {
        Self {
            turns,
            memory: None,
        }
    }

    pub fn with_memory(mut self, memory: Option<MemoryHandle>) -> Self {
        self.memory = memory;
        self
    }

    /// Most recent turn, if any
    pub fn latest(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

/// Everything a generator receives for one persona in one round
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub persona: PersonaProfile,
    pub context: ContextWindow,
    pub mode: ForumMode,
    pub round: u32,
}

/// A generated turn before it is appended to the log
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedResponse {
    pub content: String,
    /// Private reasoning shown on request, never scored
    pub thinking: Option<String>,
}

impl GeneratedResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            thinking: None,
        }
    }

    pub fn with_thinking(mut self, thinking: impl Into<String>) -> Self {
        self.thinking = Some(thinking.into());
        self
    }
}

/// Generator for persona turns
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Produce the persona's next turn
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GeneratedResponse, GenerationError>;

    /// Short name for logs and status output
    fn name(&self) -> &str;
}
