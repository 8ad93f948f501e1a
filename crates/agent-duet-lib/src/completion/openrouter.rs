use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CompletionClient, CompletionError};
use crate::config::CompletionConfig;

/// One message in a chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Request body: model identifier plus a single user message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn user(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// Extract the first assistant message from a 2xx response body.
pub fn parse_chat_response(body: &str) -> Result<String, CompletionError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::MalformedResponse(format!("{}: {}", e, body)))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| CompletionError::MalformedResponse(format!("no message content: {}", body)))
}

/// Blocking client for an OpenRouter-compatible `/chat/completions` endpoint.
pub struct OpenRouterClient {
    config: CompletionConfig,
    client: Client,
}

impl OpenRouterClient {
    /// Build the HTTP client, applying `timeout_secs` when set.
    ///
    /// # Errors
    ///
    /// `Transport` when the TLS backend or client cannot be initialised.
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Ok(Self { config, client })
    }

    /// Build from `OPENROUTER_*` environment variables.
    pub fn from_env() -> Result<Self, CompletionError> {
        let config = CompletionConfig::from_env()
            .map_err(|e| CompletionError::Configuration(e.to_string()))?;
        Self::new(config)
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str, CompletionError> {
        match self.config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(CompletionError::Configuration(
                "OPENROUTER_API_KEY is not set".to_string(),
            )),
        }
    }
}

impl CompletionClient for OpenRouterClient {
    fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let api_key = self.api_key()?;
        let request = ChatRequest::user(&self.config.model, prompt);
        let start = Instant::now();

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&request)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            warn!(status = status.as_u16(), body = %body, "completion request failed");
            return Err(CompletionError::RemoteService {
                status: status.as_u16(),
                body,
            });
        }

        debug!(
            model = %self.config.model,
            prompt_chars = prompt.len(),
            elapsed = ?start.elapsed(),
            "completion received"
        );
        parse_chat_response(&body)
    }
}
