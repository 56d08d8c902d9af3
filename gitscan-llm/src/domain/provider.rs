//! Provider capability contract

use async_trait::async_trait;

use super::error::LlmError;

/// Supported fix-generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Google,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI",
            ProviderKind::Anthropic => "ANTHROPIC",
            ProviderKind::Google => "GOOGLE",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OPENAI" => Ok(ProviderKind::OpenAi),
            "ANTHROPIC" => Ok(ProviderKind::Anthropic),
            "GOOGLE" => Ok(ProviderKind::Google),
            other => Err(LlmError::UnknownProvider(other.to_string())),
        }
    }
}

/// One completion request.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Raw completion text plus usage metadata.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub model: String,
    pub tokens_used: u32,
}

/// One capability contract for every backend; a single synchronous call.
/// Callers wanting concurrency run independent calls on separate tasks.
#[async_trait]
pub trait FixProvider: Send + Sync {
    /// Wire-format provider name (e.g. "OPENAI").
    fn provider_name(&self) -> &'static str;

    /// Model used when the caller does not override one.
    fn default_model(&self) -> &str;

    /// Produce a completion for the prompt with an optional model override.
    async fn complete(&self, prompt: &Prompt, model: Option<&str>)
        -> Result<Completion, LlmError>;
}
