//! Narrative provider over an OpenAI-compatible chat-completions endpoint
//! (Groq, OpenAI, local llama.cpp servers, ...).

use crate::config::NarrativeEnvConfig;
use crate::domain::errors::NarrativeProviderError;
use crate::domain::narrative::NarrativeProvider;
use crate::infrastructure::http_client_factory::{HttpClientFactory, join_url};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const ANALYST_SYSTEM_PROMPT: &str = "You are a professional football analyst with expertise in \
match predictions and statistical analysis. Provide concise, insightful analysis.";

/// One retry on transient failures; the caller's timeout still bounds the whole call.
const MAX_RETRIES: u32 = 1;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiCompatibleProvider {
    client: ClientWithMiddleware,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl OpenAiCompatibleProvider {
    /// `None` when no usable API key is configured.
    pub fn from_config(config: &NarrativeEnvConfig) -> Option<Self> {
        if !config.is_enabled() {
            return None;
        }
        let api_key = config.api_key.as_deref()?.trim().to_string();

        info!(
            "Narrative provider enabled: model {} at {}",
            config.model, config.base_url
        );
        Some(Self {
            client: HttpClientFactory::create_client(config.timeout(), MAX_RETRIES),
            endpoint: join_url(&config.base_url, "chat/completions"),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: ANALYST_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

fn first_completion(response: ChatResponse) -> Result<String, NarrativeProviderError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(NarrativeProviderError::EmptyCompletion)
}

#[async_trait]
impl NarrativeProvider for OpenAiCompatibleProvider {
    async fn complete(&self, prompt: &str) -> Result<String, NarrativeProviderError> {
        let body = serde_json::to_string(&self.build_request(prompt)).map_err(|e| {
            NarrativeProviderError::RequestFailed {
                reason: format!("Failed to serialize chat request: {}", e),
            }
        })?;

        debug!("Requesting narrative from {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| NarrativeProviderError::RequestFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NarrativeProviderError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| NarrativeProviderError::RequestFailed {
                    reason: format!("Failed to parse chat response: {}", e),
                })?;

        first_completion(parsed)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
