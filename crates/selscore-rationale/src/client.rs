//! The LLM transport boundary, abstracted behind a trait so the
//! generator can be tested without a real network call.

use async_trait::async_trait;
use selscore_core::error::{Result, SelError};
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// An OpenAI-compatible chat completion client over `reqwest`.
pub struct ReqwestLlmClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ReqwestLlmClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl LlmClient for ReqwestLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.4,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| SelError::LlmTransportFailure {
                message: err.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(SelError::LlmTransportFailure {
                message: format!("LLM endpoint returned status {}", response.status()),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| SelError::LlmTransportFailure {
                message: format!("failed to parse LLM response: {err}"),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| SelError::LlmTransportFailure {
                message: "LLM response had no choices".to_string(),
            })
    }
}
