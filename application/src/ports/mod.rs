//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod conversation_logger;
pub mod human_input;
pub mod persona_memory;
pub mod progress;
pub mod response_generator;
pub mod session_store;
