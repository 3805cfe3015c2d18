//! Transcript and session output formatting

pub mod console;
pub mod formatter;
