//! Persona subdomain: who can take part in a forum.

pub mod preset;
pub mod profile;
pub mod value_objects;

pub use preset::PersonaPreset;
pub use profile::PersonaProfile;
pub use value_objects::{MemoryHandle, PersonaId, TraitWeights};
