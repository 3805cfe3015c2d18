//! Response generator settings from TOML (`[generator]` section)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which adapter produces persona turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorProvider {
    /// Offline, deterministic persona-styled replies
    #[default]
    Template,
    /// OpenAI-compatible `/chat/completions` endpoint
    Openai,
}

impl GeneratorProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorProvider::Template => "template",
            GeneratorProvider::Openai => "openai",
        }
    }
}

impl fmt::Display for GeneratorProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GeneratorProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "template" => Ok(GeneratorProvider::Template),
            "openai" => Ok(GeneratorProvider::Openai),
            other => Err(format!(
                "Unknown generator provider: {}. Valid: template, openai",
                other
            )),
        }
    }
}

/// Raw generator configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeneratorConfig {
    pub provider: GeneratorProvider,
    /// Model name sent to the endpoint
    pub model: String,
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Per-call timeout in seconds
    pub timeout_seconds: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for FileGeneratorConfig {
    fn default() -> Self {
        Self {
            provider: GeneratorProvider::default(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_seconds: 120,
            temperature: 0.8,
            max_tokens: 400,
        }
    }
}

impl FileGeneratorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse() {
        assert_eq!(
            "OpenAI".parse::<GeneratorProvider>().unwrap(),
            GeneratorProvider::Openai
        );
        assert!("bedrock".parse::<GeneratorProvider>().is_err());
    }

    #[test]
    fn test_deserialize_provider() {
        let config: FileGeneratorConfig = toml::from_str(
            r#"
provider = "openai"
model = "llama3"
base_url = "http://localhost:11434/v1"
"#,
        )
        .unwrap();
        assert_eq!(config.provider, GeneratorProvider::Openai);
        assert_eq!(config.model, "llama3");
        assert_eq!(config.timeout(), Duration::from_secs(120));
    }
}
