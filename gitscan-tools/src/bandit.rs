//! Bandit adapter (Python-specific static analysis)

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use gitscan_core::config::ToolCommand;
use gitscan_core::{Category, DirectoryScanner, Finding, ScannerError, Severity};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::process::{check_version, relative_path, run_tool};

#[derive(Debug, Deserialize)]
pub struct BanditOutput {
    #[serde(default)]
    pub results: Vec<BanditIssue>,
}

#[derive(Debug, Deserialize)]
pub struct BanditIssue {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub issue_severity: String,
    #[serde(default)]
    pub issue_confidence: String,
    #[serde(default)]
    pub issue_text: String,
    #[serde(default)]
    pub test_id: String,
    #[serde(default)]
    pub test_name: String,
    #[serde(default = "default_line")]
    pub line_number: u32,
    #[serde(default)]
    pub line_range: Vec<u32>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub issue_cwe: Option<BanditCwe>,
    #[serde(default)]
    pub more_info: Option<String>,
}

fn default_line() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct BanditCwe {
    pub id: u32,
}

/// Directory scanner proxying to the Bandit CLI.
pub struct BanditScanner {
    executable: String,
    timeout: Duration,
}

impl BanditScanner {
    pub fn new(config: &ToolCommand) -> Self {
        Self {
            executable: config.executable.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    fn parse_results(&self, stdout: &str, root: &Path) -> Result<Vec<Finding>, ScannerError> {
        let output: BanditOutput =
            serde_json::from_str(stdout).map_err(|e| ScannerError::OutputParse {
                tool: "bandit".to_string(),
                message: e.to_string(),
            })?;

        let mut findings = Vec::new();
        for issue in output.results {
            let confidence = issue.issue_confidence.to_ascii_uppercase();
            // LOW-confidence results are mostly noise.
            if confidence == "LOW" {
                continue;
            }

            let mut severity = map_severity(&issue.issue_severity);
            if confidence == "MEDIUM" && severity == Severity::Critical {
                severity = Severity::High;
            }

            let start_line = issue.line_range.iter().copied().min().unwrap_or(issue.line_number);
            let end_line = issue.line_range.iter().copied().max().unwrap_or(issue.line_number);

            let mut finding = Finding::new(
                if issue.test_name.is_empty() {
                    "Security Issue".to_string()
                } else {
                    issue.test_name.clone()
                },
                issue.issue_text,
                severity,
                categorize_test(&issue.test_id),
                relative_path(&issue.filename, root),
                start_line,
                end_line,
            )
            .with_confidence(if confidence == "HIGH" { 0.85 } else { 0.7 })
            .with_rule_id(issue.test_id);

            if let Some(code) = issue.code {
                finding = finding.with_snippet(code);
            }
            if let Some(cwe) = issue.issue_cwe {
                finding = finding.with_cwe(format!("CWE-{}", cwe.id));
            }
            if let Some(more_info) = issue.more_info {
                finding = finding.with_suggested_fix(more_info);
            }

            findings.push(finding);
        }

        Ok(findings)
    }
}

#[async_trait]
impl DirectoryScanner for BanditScanner {
    fn name(&self) -> &str {
        "Bandit Scanner"
    }

    async fn check_availability(&self) -> bool {
        check_version(&self.executable).await
    }

    async fn scan_directory(&self, root: &Path) -> Result<Vec<Finding>, ScannerError> {
        if !self.check_availability().await {
            return Err(ScannerError::ToolUnavailable {
                tool: "bandit".to_string(),
            });
        }

        let root_arg = root.to_string_lossy().to_string();
        let args = [
            "-r",
            "-f",
            "json",
            "-ll",
            "--exclude",
            ".venv,venv,env,node_modules,__pycache__",
            root_arg.as_str(),
        ];

        // Bandit exits non-zero when it finds issues; stdout decides.
        let output = run_tool("bandit", &self.executable, args, self.timeout).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        if stdout.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(stderr = %stderr, "Bandit produced no output");
            return Ok(Vec::new());
        }

        let findings = self.parse_results(&stdout, root)?;
        debug!(finding_count = findings.len(), "Bandit scan completed");
        Ok(findings)
    }
}

/// Bandit severity → ours. Bandit HIGH is our CRITICAL.
fn map_severity(severity: &str) -> Severity {
    match severity.to_ascii_uppercase().as_str() {
        "HIGH" => Severity::Critical,
        "MEDIUM" => Severity::High,
        "LOW" => Severity::Medium,
        _ => Severity::Medium,
    }
}

/// Bandit B-test ids → category.
fn categorize_test(test_id: &str) -> Category {
    match test_id {
        "B102" | "B307" | "B404" | "B601" | "B602" | "B603" | "B604" | "B605" | "B606"
        | "B607" | "B609" => Category::CommandInjection,
        "B608" | "B610" | "B611" => Category::SqlInjection,
        "B105" | "B106" | "B107" => Category::SecretsExposure,
        "B108" => Category::PathTraversal,
        "B103" | "B104" | "B508" | "B509" => Category::Configuration,
        "B301" | "B302" | "B403" | "B506" => Category::Deserialization,
        "B303" | "B304" | "B305" | "B306" | "B309" | "B311" | "B312" | "B413" | "B501"
        | "B502" | "B503" | "B504" | "B505" | "B507" => Category::Cryptography,
        "B310" => Category::Ssrf,
        "B313" | "B314" | "B315" | "B316" | "B317" | "B318" | "B319" | "B320" | "B405"
        | "B406" | "B407" | "B408" | "B409" | "B410" | "B411" => Category::Xxe,
        "B308" | "B701" | "B702" | "B703" => Category::Xss,
        "B201" => Category::Configuration,
        _ => Category::Other,
    }
}
