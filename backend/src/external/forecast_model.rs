//! Generative model client
//!
//! Sends a forecast prompt to an OpenAI-compatible chat-completions API and
//! returns the raw completion text. One call per coordinate; no retry.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ModelConfig;
use crate::error::{AppError, AppResult, ModelError};

/// Prompt sent to the model for one coordinate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    /// Fixed instruction defining the output schema
    pub system: String,
    /// Per-call context (timestamp, coordinates, resolved place)
    pub user: String,
}

/// Text-generation backend for forecasts
#[async_trait]
pub trait ForecastModel: Send + Sync {
    async fn complete(&self, payload: &PromptPayload) -> Result<String, ModelError>;
}

/// Client for OpenAI-compatible chat completions (OpenRouter by default)
#[derive(Clone)]
pub struct ChatCompletionClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Result<String, ModelError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ModelError::EmptyCompletion)
    }
}

impl ChatCompletionClient {
    /// Create a new chat-completions client from configuration
    pub fn new(config: &ModelConfig) -> AppResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AppError::Configuration(
                "model.api_key is not set (DFP__MODEL__API_KEY)".to_string(),
            ));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("model client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
        })
    }
}

#[async_trait]
impl ForecastModel for ChatCompletionClient {
    async fn complete(&self, payload: &PromptPayload) -> Result<String, ModelError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &payload.system,
                },
                ChatMessage {
                    role: "user",
                    content: &payload.user,
                },
            ],
            temperature: self.temperature,
            top_p: self.top_p,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ModelError::Status { status, body });
        }

        let body: ChatResponse = response.json().await?;
        body.into_text()
    }
}
