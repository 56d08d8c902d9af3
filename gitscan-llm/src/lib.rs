//! LLM-assisted fix generation for GitScan.
//!
//! One synchronous-call capability contract ([`FixProvider`]) with
//! implementations for OpenAI, Anthropic and Google AI backends. Providers
//! only produce raw completions; prompt construction and tolerant response
//! parsing are shared, so every backend returns the same
//! [`FixResponse`]/[`SnippetAnalysis`] shapes. Fix generation is invoked on
//! demand per finding, outside the scan loop.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::use_cases::{analyze_snippet, generate_fix};
pub use domain::error::LlmError;
pub use domain::fix::{FixRequest, FixResponse, SnippetAnalysis, SnippetFinding};
pub use domain::provider::{Completion, FixProvider, Prompt, ProviderKind};
pub use infrastructure::registry::{ProviderListing, ProviderRegistry};
