//! Use cases (application services)

pub mod run_forum;
pub mod turn_scheduler;
