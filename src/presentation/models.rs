//! Request and response DTOs

use chrono::{DateTime, Utc};
use gitscan_core::{Finding, ScanResult, ScanStatus, SeverityCounts};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ── Scan requests ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanSubmitRequest {
    /// Caller-supplied scan identifier, unique per concurrent scan.
    pub scan_id: Option<String>,
    pub repository: RepositoryDto,
    #[serde(default)]
    pub options: ScanOptionsDto,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RepositoryDto {
    pub clone_url: String,
    pub branch: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ScanOptionsDto {
    /// FULL, QUICK, or CUSTOM. Defaults to FULL.
    pub scan_type: Option<String>,
    /// Scanner categories for CUSTOM scans.
    pub scanners: Option<Vec<String>>,
    pub file_patterns: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
}

// ── Scan responses ───────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct FindingDto {
    pub title: String,
    pub description: String,
    pub severity: String,
    pub category: String,
    pub file_path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub code_snippet: Option<String>,
    pub cwe_id: Option<String>,
    pub cve_id: Option<String>,
    pub suggested_fix: Option<String>,
    pub fix_confidence: Option<f64>,
    pub auto_fix_available: bool,
    pub rule_id: Option<String>,
}

impl From<&Finding> for FindingDto {
    fn from(finding: &Finding) -> Self {
        Self {
            title: finding.title.clone(),
            description: finding.description.clone(),
            severity: finding.severity.to_string(),
            category: finding.category.to_string(),
            file_path: finding.file_path.clone(),
            start_line: finding.start_line,
            end_line: finding.end_line,
            code_snippet: finding.code_snippet.clone(),
            cwe_id: finding.cwe_id.clone(),
            cve_id: finding.cve_id.clone(),
            suggested_fix: finding.suggested_fix.clone(),
            fix_confidence: finding.fix_confidence,
            auto_fix_available: finding.auto_fix_available,
            rule_id: finding.rule_id.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryDto {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
    pub total: usize,
}

impl From<SeverityCounts> for SummaryDto {
    fn from(counts: SeverityCounts) -> Self {
        Self {
            critical: counts.critical,
            high: counts.high,
            medium: counts.medium,
            low: counts.low,
            info: counts.info,
            total: counts.total,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResultResponse {
    pub scan_id: String,
    pub status: String,
    pub total_files: usize,
    pub files_scanned: usize,
    pub vulnerabilities: Vec<FindingDto>,
    pub summary: SummaryDto,
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&ScanResult> for ScanResultResponse {
    fn from(result: &ScanResult) -> Self {
        Self {
            scan_id: result.scan_id.clone(),
            status: status_str(result.status).to_string(),
            total_files: result.total_files,
            files_scanned: result.files_scanned,
            vulnerabilities: result.findings.iter().map(FindingDto::from).collect(),
            summary: result.severity_counts().into(),
            error_message: result.error_message.clone(),
            started_at: result.started_at,
            completed_at: result.completed_at,
        }
    }
}

pub fn status_str(status: ScanStatus) -> &'static str {
    match status {
        ScanStatus::Running => "RUNNING",
        ScanStatus::Completed => "COMPLETED",
        ScanStatus::Failed => "FAILED",
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CancelResponse {
    pub scan_id: String,
    pub status: String,
}

// ── Rules listing ────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct RuleCategoryDto {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RulesResponse {
    pub categories: Vec<RuleCategoryDto>,
    pub supported_languages: Vec<String>,
}

// ── LLM endpoints ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateFixRequest {
    /// OPENAI, ANTHROPIC, or GOOGLE. Defaults to OPENAI.
    pub provider: Option<String>,
    pub model: Option<String>,
    /// Caller-supplied key overriding the server configuration.
    pub api_key: Option<String>,
    pub vulnerability: VulnerabilityDto,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct VulnerabilityDto {
    pub title: String,
    pub description: String,
    pub category: String,
    pub file_path: String,
    pub code_snippet: String,
    pub language: String,
    pub cwe_id: Option<String>,
    pub suggested_fix: Option<String>,
    pub context: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FixResponseDto {
    pub fixed_code: String,
    pub explanation: String,
    pub confidence: f64,
    pub provider: String,
    pub model: String,
    pub tokens_used: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    pub provider: Option<String>,
    pub code: Option<String>,
    pub language: Option<String>,
    pub context: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProviderListingDto {
    pub provider: String,
    pub models: Vec<String>,
}

/// Success envelopes used by the LLM endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProvidersResponse {
    pub success: bool,
    pub data: Vec<ProviderListingDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateFixResponse {
    pub success: bool,
    pub data: FixResponseDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

// ── Errors and health ────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}
