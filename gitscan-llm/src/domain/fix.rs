//! Fix request/response contract

use serde::{Deserialize, Serialize};

/// Everything a provider needs to generate a fix for one vulnerability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub file_path: String,
    pub code_snippet: String,
    pub language: String,
    pub cwe_id: Option<String>,
    /// A previous suggestion to refine, if any.
    pub suggested_fix: Option<String>,
    /// Extra surrounding context the caller wants considered.
    pub context: Option<String>,
}

/// A generated fix with provenance and usage metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixResponse {
    pub fixed_code: String,
    pub explanation: String,
    /// Provider-reported confidence in [0, 1].
    pub confidence: f64,
    pub provider: String,
    pub model: String,
    pub tokens_used: u32,
}

/// LLM assessment of a pasted code snippet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnippetAnalysis {
    #[serde(default)]
    pub vulnerabilities: Vec<SnippetFinding>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub risk_score: Option<f64>,
}

/// One vulnerability reported by snippet analysis. Severity and category
/// stay free-form strings; this is model output, not the scan data model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetFinding {
    pub title: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub line_numbers: Vec<u32>,
    #[serde(default)]
    pub suggested_fix: Option<String>,
}
