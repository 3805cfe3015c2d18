//! OpenAI-compatible chat completion generator
//!
//! Works against any server exposing `POST {base_url}/chat/completions`
//! (OpenAI, Ollama, vLLM, llama.cpp server).

use super::prompt::{conversation_prompt, system_prompt};
use async_trait::async_trait;
use forum_application::{GeneratedResponse, GenerationError, GenerationRequest, ResponseGenerator};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct OpenAiGeneratorConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for OpenAiGeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            temperature: 0.8,
            max_tokens: 400,
            timeout: Duration::from_secs(120),
        }
    }
}

pub struct OpenAiResponseGenerator {
    config: OpenAiGeneratorConfig,
    http: Client,
    name: String,
}

impl OpenAiResponseGenerator {
    pub fn new(config: OpenAiGeneratorConfig) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;
        let name = format!("openai:{}", config.model);
        Ok(Self { config, http, name })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn build_body(&self, request: &GenerationRequest) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt(&request.persona, request.mode),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: conversation_prompt(request),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream: false,
        }
    }
}

#[async_trait]
impl ResponseGenerator for OpenAiResponseGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GeneratedResponse, GenerationError> {
        let body = self.build_body(&request);
        let mut http_request = self.http.post(self.endpoint()).json(&body);
        if let Some(key) = self.config.api_key.as_ref() {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request.send().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout
            } else if e.is_connect() {
                GenerationError::Unavailable(e.to_string())
            } else {
                GenerationError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationError::RequestFailed(format!(
                "HTTP {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Other(format!("Invalid response body: {}", e)))?;

        debug!(
            persona = %request.persona.id,
            model = %self.config.model,
            "Chat completion received"
        );

        let content = extract_content(parsed)?;
        Ok(GeneratedResponse::new(content).with_thinking(format!(
            "Answered as {} via {}.",
            request.persona.name, self.config.model
        )))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn extract_content(response: ChatResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(GenerationError::EmptyResponse)
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_application::ContextWindow;
    use forum_domain::{ForumMode, PersonaPreset};

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let generator = OpenAiResponseGenerator::new(OpenAiGeneratorConfig {
            base_url: "http://localhost:11434/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            generator.endpoint(),
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(generator.name(), "openai:gpt-4o-mini");
    }

    #[test]
    fn test_request_body_shape() {
        let generator = OpenAiResponseGenerator::new(OpenAiGeneratorConfig::default()).unwrap();
        let body = generator.build_body(&GenerationRequest {
            persona: PersonaPreset::Socrates.profile(),
            context: ContextWindow::default(),
            mode: ForumMode::Exploration,
            round: 1,
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
    }

    #[test]
    fn test_extract_content() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  Know thyself.  "}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(parsed).unwrap(), "Know thyself.");

        let empty: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"   "}}]}"#).unwrap();
        assert_eq!(extract_content(empty), Err(GenerationError::EmptyResponse));

        let none: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(extract_content(none), Err(GenerationError::EmptyResponse));
    }
}
