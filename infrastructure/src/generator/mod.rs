//! Response generator adapters.
//!
//! - [`TemplateResponseGenerator`]: offline and deterministic, the default
//! - [`OpenAiResponseGenerator`]: any OpenAI-compatible endpoint (feature `openai`)

pub mod prompt;
mod template;

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAiGeneratorConfig, OpenAiResponseGenerator};
pub use template::TemplateResponseGenerator;
