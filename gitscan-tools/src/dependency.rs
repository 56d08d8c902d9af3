//! Dependency vulnerability adapter
//!
//! Uses Safety for Python requirement files when it is installed; without
//! it, falls back to a small built-in table of known-vulnerable package
//! versions covering requirements files and package.json.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use gitscan_core::config::ToolCommand;
use gitscan_core::{Category, DirectoryScanner, Finding, ScannerError, Severity};
use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::process::{check_version, run_tool};

const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "venv",
    ".venv",
    "env",
    "__pycache__",
    ".git",
    "dist",
    "build",
];

const REQUIREMENT_FILES: &[&str] = &["requirements.txt", "requirements-dev.txt"];

/// Safety JSON output (dict format used by current versions).
#[derive(Debug, Deserialize)]
struct SafetyOutput {
    #[serde(default)]
    vulnerabilities: Vec<SafetyVulnerability>,
}

#[derive(Debug, Deserialize)]
struct SafetyVulnerability {
    #[serde(default, alias = "name")]
    package_name: String,
    #[serde(default, alias = "version")]
    analyzed_version: String,
    #[serde(default, alias = "id")]
    vulnerability_id: String,
    #[serde(default, alias = "description")]
    advisory: String,
    #[serde(default)]
    cvss: Option<SafetyCvss>,
    #[serde(default)]
    cve: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SafetyCvss {
    #[serde(default)]
    score: f64,
}

/// Directory scanner for vulnerable dependencies.
pub struct DependencyScanner {
    safety_executable: String,
    timeout: Duration,
}

impl DependencyScanner {
    pub fn new(config: &ToolCommand) -> Self {
        Self {
            safety_executable: config.executable.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    fn find_manifests(&self, root: &Path, names: &[&str]) -> Vec<PathBuf> {
        WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir()
                    && entry
                        .file_name()
                        .to_str()
                        .map(|name| EXCLUDED_DIRS.contains(&name))
                        .unwrap_or(false))
            })
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .map(|name| names.contains(&name))
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect()
    }

    async fn scan_with_safety(
        &self,
        manifest: &Path,
        rel_path: &str,
    ) -> Result<Vec<Finding>, ScannerError> {
        let manifest_arg = manifest.to_string_lossy().to_string();
        let args = [
            "check",
            "-r",
            manifest_arg.as_str(),
            "--json",
            "--full-report",
        ];

        // Safety exits with code 64 when vulnerabilities are found.
        let output = run_tool("safety", &self.safety_executable, args, self.timeout).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parsed: SafetyOutput =
            serde_json::from_str(&stdout).map_err(|e| ScannerError::OutputParse {
                tool: "safety".to_string(),
                message: e.to_string(),
            })?;

        let findings = parsed
            .vulnerabilities
            .into_iter()
            .map(|vuln| {
                let severity = vuln
                    .cvss
                    .as_ref()
                    .map(|cvss| cvss_to_severity(cvss.score))
                    .unwrap_or(Severity::High);
                let snippet = if vuln.analyzed_version.is_empty() {
                    vuln.package_name.clone()
                } else {
                    format!("{}=={}", vuln.package_name, vuln.analyzed_version)
                };

                let mut finding = Finding::new(
                    format!("Vulnerable dependency: {}", vuln.package_name),
                    format!(
                        "{}\n\nInstalled version: {}",
                        vuln.advisory, vuln.analyzed_version
                    ),
                    severity,
                    Category::Dependency,
                    rel_path,
                    1,
                    1,
                )
                .with_snippet(snippet)
                .with_suggested_fix(format!(
                    "Update {} to a non-vulnerable version",
                    vuln.package_name
                ))
                .with_confidence(0.95)
                .with_rule_id(vuln.vulnerability_id);

                if let Some(cve) = vuln.cve {
                    finding = finding.with_cve(cve);
                }
                finding
            })
            .collect();

        Ok(findings)
    }
}

#[async_trait]
impl DirectoryScanner for DependencyScanner {
    fn name(&self) -> &str {
        "Dependency Scanner"
    }

    async fn check_availability(&self) -> bool {
        // The built-in table keeps this scanner useful without Safety.
        true
    }

    async fn scan_directory(&self, root: &Path) -> Result<Vec<Finding>, ScannerError> {
        let safety_available = check_version(&self.safety_executable).await;
        let mut findings = Vec::new();

        for manifest in self.find_manifests(root, REQUIREMENT_FILES) {
            let rel_path = manifest
                .strip_prefix(root)
                .unwrap_or(&manifest)
                .to_string_lossy()
                .to_string();

            if safety_available {
                match self.scan_with_safety(&manifest, &rel_path).await {
                    Ok(mut file_findings) => findings.append(&mut file_findings),
                    Err(e) => warn!(file = %rel_path, error = %e, "Safety scan failed"),
                }
            } else {
                let content = std::fs::read_to_string(&manifest)?;
                findings.extend(builtin::scan_requirements(&content, &rel_path));
            }
        }

        for manifest in self.find_manifests(root, &["package.json"]) {
            let rel_path = manifest
                .strip_prefix(root)
                .unwrap_or(&manifest)
                .to_string_lossy()
                .to_string();
            let content = std::fs::read_to_string(&manifest)?;
            findings.extend(builtin::scan_package_json(&content, &rel_path));
        }

        debug!(
            finding_count = findings.len(),
            safety_available, "Dependency scan completed"
        );
        Ok(findings)
    }
}

/// CVSS score → severity banding.
fn cvss_to_severity(score: f64) -> Severity {
    if score >= 9.0 {
        Severity::Critical
    } else if score >= 7.0 {
        Severity::High
    } else if score >= 4.0 {
        Severity::Medium
    } else if score > 0.0 {
        Severity::Low
    } else {
        Severity::Info
    }
}

/// Built-in known-vulnerable version table, used without external tooling.
mod builtin {
    use super::*;

    struct KnownVulnerable {
        package: &'static str,
        vulnerable_prefixes: &'static [&'static str],
        advisory: &'static str,
        cve: Option<&'static str>,
    }

    const PYTHON_PACKAGES: &[KnownVulnerable] = &[
        KnownVulnerable {
            package: "django",
            vulnerable_prefixes: &["1.", "2.0", "2.1", "2.2.0", "2.2.1", "2.2.2"],
            advisory: "Multiple CVEs in old Django versions",
            cve: None,
        },
        KnownVulnerable {
            package: "requests",
            vulnerable_prefixes: &["2.3.", "2.4.", "2.5."],
            advisory: "Credential leak to redirect targets",
            cve: Some("CVE-2018-18074"),
        },
        KnownVulnerable {
            package: "pyyaml",
            vulnerable_prefixes: &["3.", "4.", "5.1", "5.2", "5.3"],
            advisory: "Arbitrary code execution via full_load",
            cve: Some("CVE-2020-14343"),
        },
        KnownVulnerable {
            package: "pillow",
            vulnerable_prefixes: &["6.", "7.0", "7.1", "8.0", "8.1.0", "8.1.1"],
            advisory: "Multiple CVEs in old Pillow versions",
            cve: None,
        },
        KnownVulnerable {
            package: "urllib3",
            vulnerable_prefixes: &["1.24", "1.25.0", "1.25.1", "1.25.2"],
            advisory: "ReDoS in URL parsing",
            cve: Some("CVE-2021-33503"),
        },
    ];

    const NPM_PACKAGES: &[KnownVulnerable] = &[
        KnownVulnerable {
            package: "lodash",
            vulnerable_prefixes: &["4.17.11", "4.17.10", "4.17.4"],
            advisory: "Prototype pollution in defaultsDeep",
            cve: Some("CVE-2019-10744"),
        },
        KnownVulnerable {
            package: "axios",
            vulnerable_prefixes: &["0.18.", "0.19.0"],
            advisory: "Server-side request forgery via redirects",
            cve: Some("CVE-2020-28168"),
        },
        KnownVulnerable {
            package: "minimist",
            vulnerable_prefixes: &["0.", "1.0", "1.1", "1.2.0", "1.2.1", "1.2.2", "1.2.3", "1.2.4", "1.2.5"],
            advisory: "Prototype pollution",
            cve: Some("CVE-2021-44906"),
        },
        KnownVulnerable {
            package: "node-fetch",
            vulnerable_prefixes: &["2.6.0", "2.6.1", "3.0.0"],
            advisory: "Exposure of sensitive headers to redirect targets",
            cve: Some("CVE-2022-0235"),
        },
    ];

    pub fn scan_requirements(content: &str, file_path: &str) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim().to_ascii_lowercase();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            for known in PYTHON_PACKAGES {
                let Some(rest) = line.strip_prefix(known.package) else {
                    continue;
                };
                let version: String = rest
                    .trim_start_matches(['<', '>', '=', '~', '!'])
                    .chars()
                    .take_while(|c| c.is_ascii_digit() || *c == '.')
                    .collect();
                if version.is_empty() {
                    continue;
                }

                if known
                    .vulnerable_prefixes
                    .iter()
                    .any(|prefix| version.starts_with(prefix))
                {
                    findings.push(known_vulnerable_finding(
                        known,
                        &version,
                        file_path,
                        index as u32 + 1,
                        raw_line.trim(),
                    ));
                    break;
                }
            }
        }

        findings
    }

    pub fn scan_package_json(content: &str, file_path: &str) -> Vec<Finding> {
        let Ok(manifest) = serde_json::from_str::<serde_json::Value>(content) else {
            warn!(file = file_path, "Failed to parse package.json");
            return Vec::new();
        };

        let mut findings = Vec::new();
        for section in ["dependencies", "devDependencies"] {
            let Some(deps) = manifest.get(section).and_then(|v| v.as_object()) else {
                continue;
            };

            for (name, version_value) in deps {
                let Some(version_spec) = version_value.as_str() else {
                    continue;
                };
                let version = version_spec.trim_start_matches(['^', '~', '>', '=', '<']);

                for known in NPM_PACKAGES {
                    if name.to_ascii_lowercase() != known.package {
                        continue;
                    }
                    if known
                        .vulnerable_prefixes
                        .iter()
                        .any(|prefix| version.starts_with(prefix))
                    {
                        findings.push(known_vulnerable_finding(
                            known,
                            version,
                            file_path,
                            1,
                            &format!("\"{}\": \"{}\"", name, version_spec),
                        ));
                    }
                }
            }
        }

        findings
    }

    fn known_vulnerable_finding(
        known: &KnownVulnerable,
        version: &str,
        file_path: &str,
        line: u32,
        snippet: &str,
    ) -> Finding {
        let mut finding = Finding::new(
            format!("Known vulnerable version of {}", known.package),
            format!(
                "{} version {} has known security vulnerabilities. {}",
                known.package, version, known.advisory
            ),
            Severity::High,
            Category::Dependency,
            file_path,
            line,
            line,
        )
        .with_snippet(snippet)
        .with_suggested_fix(format!("Update {} to the latest version", known.package))
        .with_confidence(0.9)
        .with_rule_id(format!("dep-{}", known.package));

        if let Some(cve) = known.cve {
            finding = finding.with_cve(cve);
        }
        finding
    }
}
