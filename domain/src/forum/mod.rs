//! Forum policy: mode and session-scoped configuration.

pub mod config;
pub mod mode;

pub use config::ForumConfig;
pub use mode::ForumMode;
