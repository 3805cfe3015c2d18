//! Infrastructure layer for philosopher-forum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration file loading, session
//! storage, conversation logging and response generators.

pub mod config;
pub mod generator;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileForumConfig, FileGeneratorConfig,
    FileLoggingConfig, FileParticipantsConfig, FileReplConfig, FileSessionConfig,
    GeneratorProvider,
};
#[cfg(feature = "openai")]
pub use generator::{OpenAiGeneratorConfig, OpenAiResponseGenerator};
pub use generator::TemplateResponseGenerator;
pub use logging::JsonlConversationLogger;
pub use storage::JsonFileSessionStore;
