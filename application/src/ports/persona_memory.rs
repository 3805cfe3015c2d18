//! Persona memory port
//!
//! Supplies the memory reference handed to a generator alongside the
//! context window. What the handle points at is up to the adapter.

use forum_domain::{MemoryHandle, PersonaId};
use std::collections::HashMap;

pub trait PersonaMemoryPort: Send + Sync {
    fn memory_for(&self, persona: &PersonaId) -> Option<MemoryHandle>;
}

/// No memory for anyone
pub struct NoPersonaMemory;

impl PersonaMemoryPort for NoPersonaMemory {
    fn memory_for(&self, _persona: &PersonaId) -> Option<MemoryHandle> {
        None
    }
}

/// Fixed handles keyed by persona id
#[derive(Debug, Default)]
pub struct StaticPersonaMemory {
    handles: HashMap<PersonaId, MemoryHandle>,
}

impl StaticPersonaMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handle(mut self, persona: PersonaId, handle: MemoryHandle) -> Self {
        self.handles.insert(persona, handle);
        self
    }
}

impl PersonaMemoryPort for StaticPersonaMemory {
    fn memory_for(&self, persona: &PersonaId) -> Option<MemoryHandle> {
        self.handles.get(persona).cloned()
    }
}
