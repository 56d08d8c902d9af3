//! Anthropic messages-API provider

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::domain::error::LlmError;
use crate::domain::provider::{Completion, FixProvider, Prompt};

pub const DEFAULT_MODEL: &str = "claude-3-opus-20240229";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            error!(error = %e, "Failed to build HTTP client with timeout, using default");
            Client::new()
        });

        Self {
            client,
            api_key: api_key.into(),
            base_url: "https://api.anthropic.com/v1".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

#[async_trait]
impl FixProvider for AnthropicProvider {
    fn provider_name(&self) -> &'static str {
        "ANTHROPIC"
    }

    fn default_model(&self) -> &str {
        DEFAULT_MODEL
    }

    async fn complete(
        &self,
        prompt: &Prompt,
        model: Option<&str>,
    ) -> Result<Completion, LlmError> {
        let model = model.unwrap_or(DEFAULT_MODEL);

        let body = MessagesRequest {
            model,
            max_tokens: prompt.max_tokens,
            temperature: prompt.temperature,
            system: prompt.system.as_deref(),
            messages: vec![Message {
                role: "user",
                content: &prompt.user,
            }],
        };

        debug!(model, "Sending Anthropic completion request");
        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                provider: "ANTHROPIC",
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        let text = parsed
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() {
            return Err(LlmError::EmptyResponse("ANTHROPIC"));
        }

        let tokens_used = parsed
            .usage
            .map(|u| u.input_tokens + u.output_tokens)
            .unwrap_or(0);

        Ok(Completion {
            text,
            model: model.to_string(),
            tokens_used,
        })
    }
}
