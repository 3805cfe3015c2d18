//! Live progress and turn display during a forum run

pub mod reporter;

pub use reporter::{ProgressReporter, SimpleProgress};
