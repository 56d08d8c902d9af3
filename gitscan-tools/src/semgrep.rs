//! Semgrep adapter
//!
//! Runs Semgrep once over the working copy with the security-audit, secrets
//! and OWASP Top 10 rule packs and maps its JSON results onto canonical
//! findings.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use gitscan_core::config::ToolCommand;
use gitscan_core::{Category, DirectoryScanner, Finding, ScannerError, Severity};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::process::{check_version, relative_path, run_tool};

/// Semgrep CLI JSON output, reduced to the fields the adapter consumes.
#[derive(Debug, Deserialize)]
pub struct SemgrepOutput {
    #[serde(default)]
    pub results: Vec<SemgrepResult>,
}

#[derive(Debug, Deserialize)]
pub struct SemgrepResult {
    pub check_id: String,
    pub path: String,
    pub start: Position,
    pub end: Position,
    pub extra: SemgrepResultExtra,
}

#[derive(Debug, Deserialize)]
pub struct Position {
    pub line: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct SemgrepResultExtra {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub lines: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub fix: Option<String>,
}

/// Directory scanner proxying to the Semgrep CLI.
pub struct SemgrepScanner {
    executable: String,
    timeout: Duration,
}

impl SemgrepScanner {
    pub fn new(config: &ToolCommand) -> Self {
        Self {
            executable: config.executable.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    fn parse_results(&self, stdout: &str, root: &Path) -> Result<Vec<Finding>, ScannerError> {
        let output: SemgrepOutput =
            serde_json::from_str(stdout).map_err(|e| ScannerError::OutputParse {
                tool: "semgrep".to_string(),
                message: e.to_string(),
            })?;

        let findings = output
            .results
            .into_iter()
            .map(|result| {
                let severity = map_severity(&result.extra.severity);
                let category = categorize_rule(&result.check_id, &result.extra.metadata);
                let cwe = first_cwe(&result.extra.metadata);

                let mut finding = Finding::new(
                    format_title(&result.check_id),
                    result.extra.message,
                    severity,
                    category,
                    relative_path(&result.path, root),
                    result.start.line,
                    result.end.line,
                )
                .with_snippet(result.extra.lines)
                .with_confidence(0.9)
                .with_rule_id(result.check_id);

                if let Some(cwe) = cwe {
                    finding = finding.with_cwe(cwe);
                }
                if let Some(fix) = result.extra.fix {
                    finding = finding.with_suggested_fix(fix).with_auto_fix_available(true);
                }

                finding
            })
            .collect();

        Ok(findings)
    }
}

#[async_trait]
impl DirectoryScanner for SemgrepScanner {
    fn name(&self) -> &str {
        "Semgrep Scanner"
    }

    async fn check_availability(&self) -> bool {
        check_version(&self.executable).await
    }

    async fn scan_directory(&self, root: &Path) -> Result<Vec<Finding>, ScannerError> {
        if !self.check_availability().await {
            return Err(ScannerError::ToolUnavailable {
                tool: "semgrep".to_string(),
            });
        }

        let root_arg = root.to_string_lossy().to_string();
        let args = [
            "--config",
            "p/security-audit",
            "--config",
            "p/secrets",
            "--config",
            "p/owasp-top-ten",
            "--json",
            "--quiet",
            "--no-git-ignore",
            "--metrics=off",
            "--timeout",
            "30",
            root_arg.as_str(),
        ];

        let output = run_tool("semgrep", &self.executable, args, self.timeout).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        if stdout.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(stderr = %stderr, "Semgrep produced no output");
            return Ok(Vec::new());
        }

        let findings = self.parse_results(&stdout, root)?;
        debug!(finding_count = findings.len(), "Semgrep scan completed");
        Ok(findings)
    }
}

/// Semgrep severity → ours. ERROR findings from the curated security packs
/// are treated as critical.
fn map_severity(severity: &str) -> Severity {
    match severity.to_ascii_uppercase().as_str() {
        "ERROR" => Severity::Critical,
        "WARNING" => Severity::High,
        "INFO" => Severity::Medium,
        _ => Severity::Medium,
    }
}

/// Turn a rule id like `python.flask.security.audit.render-template-string`
/// into a readable title.
fn format_title(rule_id: &str) -> String {
    let mut id = rule_id;
    for prefix in ["python.", "javascript.", "generic.", "java.", "go."] {
        if let Some(stripped) = id.strip_prefix(prefix) {
            id = stripped;
            break;
        }
    }

    let spaced = id.replace(['-', '_'], " ").replace('.', " - ");
    spaced
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Category from rule metadata, falling back to keywords in the rule id.
fn categorize_rule(rule_id: &str, metadata: &HashMap<String, serde_json::Value>) -> Category {
    if let Some(category) = metadata.get("category").and_then(|v| v.as_str()) {
        match category.to_ascii_lowercase().as_str() {
            "correctness" | "best-practice" => return Category::CodeQuality,
            "xss" => return Category::Xss,
            "sqli" => return Category::SqlInjection,
            "injection" => return Category::CommandInjection,
            "path-traversal" => return Category::PathTraversal,
            "ssrf" => return Category::Ssrf,
            "xxe" => return Category::Xxe,
            "deserialization" => return Category::Deserialization,
            "crypto" => return Category::Cryptography,
            "secrets" => return Category::SecretsExposure,
            "auth" => return Category::Authentication,
            _ => {}
        }
    }

    let rule = rule_id.to_ascii_lowercase();
    if rule.contains("xss") || rule.contains("cross-site") {
        Category::Xss
    } else if rule.contains("sql") {
        Category::SqlInjection
    } else if rule.contains("command") || rule.contains("shell") || rule.contains("exec") {
        Category::CommandInjection
    } else if rule.contains("path") || rule.contains("traversal") || rule.contains("directory") {
        Category::PathTraversal
    } else if rule.contains("ssrf") {
        Category::Ssrf
    } else if rule.contains("xxe") || rule.contains("xml") {
        Category::Xxe
    } else if rule.contains("deserial") || rule.contains("pickle") {
        Category::Deserialization
    } else if rule.contains("secret")
        || rule.contains("password")
        || rule.contains("credential")
        || rule.contains("api-key")
    {
        Category::SecretsExposure
    } else if rule.contains("crypto") || rule.contains("cipher") || rule.contains("hash") {
        Category::Cryptography
    } else if rule.contains("auth") {
        Category::Authentication
    } else {
        Category::Other
    }
}

/// First CWE id from rule metadata, if any.
fn first_cwe(metadata: &HashMap<String, serde_json::Value>) -> Option<String> {
    match metadata.get("cwe")? {
        serde_json::Value::Array(values) => values
            .first()
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        serde_json::Value::String(value) => Some(value.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> SemgrepScanner {
        SemgrepScanner::new(&ToolCommand {
            executable: "semgrep".to_string(),
            timeout_seconds: 300,
        })
    }

    #[test]
    fn parses_results_into_findings() {
        let json = r#"{
            "results": [
                {
                    "check_id": "python.lang.security.audit.dangerous-eval",
                    "path": "/tmp/scan/app/main.py",
                    "start": {"line": 5, "col": 1},
                    "end": {"line": 5, "col": 15},
                    "extra": {
                        "message": "Avoid eval()",
                        "lines": "eval(user_input)",
                        "severity": "ERROR",
                        "metadata": {"cwe": ["CWE-95"], "category": "injection"}
                    }
                }
            ],
            "errors": []
        }"#;

        let findings = scanner()
            .parse_results(json, Path::new("/tmp/scan"))
            .unwrap();

        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.severity, Severity::Critical);
        assert_eq!(finding.category, Category::CommandInjection);
        assert_eq!(finding.file_path, "app/main.py");
        assert_eq!(finding.start_line, 5);
        assert_eq!(finding.cwe_id.as_deref(), Some("CWE-95"));
        assert_eq!(finding.fix_confidence, Some(0.9));
        assert_eq!(
            finding.rule_id.as_deref(),
            Some("python.lang.security.audit.dangerous-eval")
        );
    }

    #[test]
    fn malformed_output_is_a_parse_error() {
        let result = scanner().parse_results("not json", Path::new("/tmp/scan"));
        assert!(matches!(
            result,
            Err(ScannerError::OutputParse { .. })
        ));
    }

    #[test]
    fn titles_are_readable() {
        assert_eq!(
            format_title("python.flask.render-template-string"),
            "Flask - Render Template String"
        );
    }

    #[test]
    fn rule_id_keywords_drive_category_fallback() {
        let empty = HashMap::new();
        assert_eq!(
            categorize_rule("js.browser.security.dom-xss", &empty),
            Category::Xss
        );
        assert_eq!(
            categorize_rule("generic.secrets.gitleaks.aws", &empty),
            Category::SecretsExposure
        );
        assert_eq!(categorize_rule("misc.unknown.rule", &empty), Category::Other);
    }
}
