//! Google AI (Gemini) provider

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::domain::error::LlmError;
use crate::domain::provider::{Completion, FixProvider, Prompt};

pub const DEFAULT_MODEL: &str = "gemini-pro";

pub struct GoogleAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleAiProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            error!(error = %e, "Failed to build HTTP client with timeout, using default");
            Client::new()
        });

        Self {
            client,
            api_key: api_key.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(default, rename = "totalTokenCount")]
    total_token_count: u32,
}

#[async_trait]
impl FixProvider for GoogleAiProvider {
    fn provider_name(&self) -> &'static str {
        "GOOGLE"
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

        // Gemini has no system role on this endpoint; fold the system prompt
        // into the user content.
        let text = match &prompt.system {
            Some(system) => format!("{}\n\n{}", system, prompt.user),
            None => prompt.user.clone(),
        };

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
            generation_config: GenerationConfig {
                temperature: prompt.temperature,
                max_output_tokens: prompt.max_tokens,
            },
        };

        debug!(model, "Sending Google AI completion request");
        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent?key={}",
                self.base_url, model, self.api_key
            ))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                provider: "GOOGLE",
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyResponse("GOOGLE"))?;

        Ok(Completion {
            text,
            model: model.to_string(),
            tokens_used: parsed
                .usage_metadata
                .map(|u| u.total_token_count)
                .unwrap_or(0),
        })
    }
}
