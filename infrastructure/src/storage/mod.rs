//! Session persistence adapters.

mod json_session_store;

pub use json_session_store::JsonFileSessionStore;
