//! OpenAI-compatible chat completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mentor_core::{config::LlmConfig, Message};

use crate::{LanguageModel, LlmError};

/// Optional system prompt prepended to every request.
const SYSTEM_PROMPT: &str =
    "You are a helpful tutoring assistant. Ground your answers in the provided context when it is relevant.";

/// Language model client for any OpenAI-compatible `/chat/completions`
/// endpoint.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    api_key: String,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Build a client from the LLM config section and a resolved API key.
    pub fn new(config: &LlmConfig, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key,
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn generate(&self, messages: &[Message]) -> Result<Message, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut wire = Vec::with_capacity(messages.len() + 1);
        wire.push(WireMessage {
            role: "system",
            content: SYSTEM_PROMPT,
        });
        for msg in messages {
            wire.push(WireMessage {
                role: msg.role.as_str(),
                content: &msg.content,
            });
        }

        let payload = CompletionRequest {
            model: &self.model,
            messages: wire,
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => LlmError::Authentication(text),
                429 => LlmError::RateLimited,
                _ => LlmError::InvalidRequest(text),
            });
        }

        let data: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = data
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Parse("no choices in response".to_string()))?;

        tracing::debug!(model = %self.model, reply_len = content.len(), "Chat completion received");

        Ok(Message::assistant(content))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
