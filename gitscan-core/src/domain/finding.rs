//! Finding types shared by every scanner
//!
//! A [`Finding`] is one reported vulnerability instance at a specific
//! file/line. Findings are immutable once produced by a scanner; the
//! orchestrator only reorders and filters them.

use serde::{Deserialize, Serialize};

/// Finding severity, ordered most severe first.
///
/// The derived `Ord` follows declaration order, so an ascending sort puts
/// `Critical` findings at the top of a report.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    #[default]
    Medium,
    Low,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        };
        write!(f, "{}", s)
    }
}

/// Vulnerability class of a finding.
///
/// Closed enumeration; adapters map external tool taxonomies onto it before
/// findings reach the deduplication engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Xss,
    SqlInjection,
    CommandInjection,
    PathTraversal,
    Ssrf,
    Xxe,
    Deserialization,
    Authentication,
    Authorization,
    Cryptography,
    SecretsExposure,
    Dependency,
    Configuration,
    CodeQuality,
    Csrf,
    Session,
    Idor,
    MassAssignment,
    OpenRedirect,
    Other,
}

impl Category {
    /// Wire-format name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Xss => "XSS",
            Category::SqlInjection => "SQL_INJECTION",
            Category::CommandInjection => "COMMAND_INJECTION",
            Category::PathTraversal => "PATH_TRAVERSAL",
            Category::Ssrf => "SSRF",
            Category::Xxe => "XXE",
            Category::Deserialization => "DESERIALIZATION",
            Category::Authentication => "AUTHENTICATION",
            Category::Authorization => "AUTHORIZATION",
            Category::Cryptography => "CRYPTOGRAPHY",
            Category::SecretsExposure => "SECRETS_EXPOSURE",
            Category::Dependency => "DEPENDENCY",
            Category::Configuration => "CONFIGURATION",
            Category::CodeQuality => "CODE_QUALITY",
            Category::Csrf => "CSRF",
            Category::Session => "SESSION",
            Category::Idor => "IDOR",
            Category::MassAssignment => "MASS_ASSIGNMENT",
            Category::OpenRedirect => "OPEN_REDIRECT",
            Category::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s.to_ascii_uppercase().as_str() {
            "XSS" => Category::Xss,
            "SQL_INJECTION" => Category::SqlInjection,
            "COMMAND_INJECTION" => Category::CommandInjection,
            "PATH_TRAVERSAL" => Category::PathTraversal,
            "SSRF" => Category::Ssrf,
            "XXE" => Category::Xxe,
            "DESERIALIZATION" => Category::Deserialization,
            "AUTHENTICATION" => Category::Authentication,
            "AUTHORIZATION" => Category::Authorization,
            "CRYPTOGRAPHY" => Category::Cryptography,
            "SECRETS_EXPOSURE" => Category::SecretsExposure,
            "DEPENDENCY" => Category::Dependency,
            "CONFIGURATION" => Category::Configuration,
            "CODE_QUALITY" => Category::CodeQuality,
            "CSRF" => Category::Csrf,
            "SESSION" => Category::Session,
            "IDOR" => Category::Idor,
            "MASS_ASSIGNMENT" => Category::MassAssignment,
            "OPEN_REDIRECT" => Category::OpenRedirect,
            "OTHER" => Category::Other,
            other => return Err(UnknownCategory(other.to_string())),
        };
        Ok(category)
    }
}

/// Error returned when parsing an unrecognised category name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown vulnerability category: {0}")]
pub struct UnknownCategory(pub String);

/// One reported vulnerability instance at a specific file/line.
///
/// Invariants: `1 <= start_line <= end_line`, and `fix_confidence` (when
/// present) lies in `[0, 1]`. [`Finding::new`] and the builder methods
/// normalise inputs so these hold for every constructed value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: Category,
    /// File path relative to the scan root.
    pub file_path: String,
    /// 1-based, inclusive.
    pub start_line: u32,
    /// 1-based, inclusive.
    pub end_line: u32,
    pub code_snippet: Option<String>,
    pub cwe_id: Option<String>,
    pub cve_id: Option<String>,
    pub suggested_fix: Option<String>,
    pub fix_confidence: Option<f64>,
    pub auto_fix_available: bool,
    pub rule_id: Option<String>,
}

impl Finding {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        category: Category,
        file_path: impl Into<String>,
        start_line: u32,
        end_line: u32,
    ) -> Self {
        let start_line = start_line.max(1);
        let end_line = end_line.max(start_line);
        Self {
            title: title.into(),
            description: description.into(),
            severity,
            category,
            file_path: file_path.into(),
            start_line,
            end_line,
            code_snippet: None,
            cwe_id: None,
            cve_id: None,
            suggested_fix: None,
            fix_confidence: None,
            auto_fix_available: false,
            rule_id: None,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.code_snippet = Some(snippet.into());
        self
    }

    pub fn with_cwe(mut self, cwe_id: impl Into<String>) -> Self {
        self.cwe_id = Some(cwe_id.into());
        self
    }

    pub fn with_cve(mut self, cve_id: impl Into<String>) -> Self {
        self.cve_id = Some(cve_id.into());
        self
    }

    pub fn with_suggested_fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = Some(fix.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.fix_confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    pub fn with_auto_fix_available(mut self, available: bool) -> Self {
        self.auto_fix_available = available;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_most_severe_first() {
        let mut severities = vec![
            Severity::Info,
            Severity::Critical,
            Severity::Low,
            Severity::High,
            Severity::Medium,
        ];
        severities.sort();
        assert_eq!(
            severities,
            vec![
                Severity::Critical,
                Severity::High,
                Severity::Medium,
                Severity::Low,
                Severity::Info,
            ]
        );
    }

    #[test]
    fn category_round_trips_through_wire_form() {
        for category in [
            Category::SqlInjection,
            Category::SecretsExposure,
            Category::CodeQuality,
            Category::Other,
        ] {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("NOT_A_CATEGORY".parse::<Category>().is_err());
    }

    #[test]
    fn severity_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
        let json = serde_json::to_string(&Category::SqlInjection).unwrap();
        assert_eq!(json, "\"SQL_INJECTION\"");
    }

    #[test]
    fn finding_normalises_line_invariants() {
        let finding = Finding::new(
            "t",
            "d",
            Severity::High,
            Category::Xss,
            "a.js",
            10,
            4,
        );
        assert_eq!(finding.start_line, 10);
        assert_eq!(finding.end_line, 10);

        let finding = Finding::new("t", "d", Severity::High, Category::Xss, "a.js", 0, 0);
        assert_eq!(finding.start_line, 1);
        assert_eq!(finding.end_line, 1);
    }

    #[test]
    fn confidence_is_clamped() {
        let finding = Finding::new("t", "d", Severity::Low, Category::Other, "f", 1, 1)
            .with_confidence(1.7);
        assert_eq!(finding.fix_confidence, Some(1.0));
    }
}
