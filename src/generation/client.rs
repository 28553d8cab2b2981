//! Chat-completion client.
//!
//! The [`CompletionClient`] trait is the seam handlers depend on; the
//! OpenAI implementation is the only production backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::OpenAiConfig;

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 1000;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("api error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("empty completion")]
    Empty,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends one system + user exchange and returns the reply text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError>;

    /// Model name recorded next to generated recipes.
    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplyMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    pub(crate) fn into_text(self) -> Result<String, CompletionError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(CompletionError::Empty)
    }
}

pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    pub(crate) fn request<'a>(&'a self, system: &'a str, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError> {
        debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "sending chat completion"
        );

        let resp = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&self.request(system, prompt))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;
        parsed.into_text()
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
