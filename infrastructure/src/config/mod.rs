//! Configuration file loading for philosopher-forum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PHILOSOPHER_FORUM_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./forum.toml` or `./.forum.toml`
//! 4. Global: `$XDG_CONFIG_HOME/philosopher-forum/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileCustomPersona, FileForumConfig, FileGeneratorConfig,
    FileLoggingConfig, FileParticipantsConfig, FileReplConfig, FileSessionConfig,
    GeneratorProvider,
};
pub use loader::ConfigLoader;
