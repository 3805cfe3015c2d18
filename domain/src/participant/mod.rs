//! Participant subdomain: runtime state of each persona in a session.

pub mod record;
pub mod registry;

pub use record::ParticipantRecord;
pub use registry::ParticipantRegistry;
