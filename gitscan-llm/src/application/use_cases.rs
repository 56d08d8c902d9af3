//! Use cases over the provider capability
//!
//! These wrap any [`FixProvider`] with the shared prompts and parsers, so
//! generate-fix and analyze-snippet behave identically across backends.

use tracing::info;

use crate::domain::error::LlmError;
use crate::domain::fix::{FixRequest, FixResponse, SnippetAnalysis};
use crate::domain::provider::{FixProvider, Prompt};
use crate::infrastructure::prompts;

/// Temperature for code generation; low for determinism.
const FIX_TEMPERATURE: f32 = 0.3;
/// Temperature for analysis.
const ANALYSIS_TEMPERATURE: f32 = 0.2;

/// Generate a fix for one vulnerability.
pub async fn generate_fix(
    provider: &dyn FixProvider,
    request: &FixRequest,
    model: Option<&str>,
    max_tokens: u32,
) -> Result<FixResponse, LlmError> {
    let prompt = Prompt {
        system: Some(prompts::CODE_FIX_SYSTEM_PROMPT.to_string()),
        user: prompts::fix_user_prompt(request),
        temperature: FIX_TEMPERATURE,
        max_tokens,
    };

    info!(
        provider = provider.provider_name(),
        vulnerability = %request.title,
        "Generating fix"
    );

    let completion = provider.complete(&prompt, model).await?;
    Ok(prompts::parse_fix_response(
        &completion.text,
        provider.provider_name(),
        &completion.model,
        completion.tokens_used,
    ))
}

/// Analyze a pasted code snippet for security issues.
pub async fn analyze_snippet(
    provider: &dyn FixProvider,
    code: &str,
    language: &str,
    context: Option<&str>,
    max_tokens: u32,
) -> Result<SnippetAnalysis, LlmError> {
    let prompt = Prompt {
        system: Some("You are a security expert analyzing code for vulnerabilities.".to_string()),
        user: prompts::analysis_prompt(code, language, context),
        temperature: ANALYSIS_TEMPERATURE,
        max_tokens,
    };

    info!(provider = provider.provider_name(), language, "Analyzing snippet");

    let completion = provider.complete(&prompt, None).await?;
    Ok(prompts::parse_analysis(&completion.text))
}
