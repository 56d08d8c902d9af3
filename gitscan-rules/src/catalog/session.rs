//! Session management rules

use gitscan_core::{Category, Severity};

use crate::engine::{PatternRule, RuleEngine};
use crate::language::Language;

const JS_TS: &[Language] = &[Language::JavaScript, Language::TypeScript];

pub fn rules() -> Vec<PatternRule> {
    vec![
        PatternRule {
            id: "session-001",
            pattern: r"(?:session_?id|sessionId|JSESSIONID|PHPSESSID)\s*=\s*[^&\n]*(?:req\.query|req\.params|\$_GET|getParameter)",
            title: "Session ID passed in URL",
            description: "Session ID is retrieved from URL parameters, exposing it in logs and referrer headers",
            severity: Severity::High,
            category: Category::Session,
            cwe_id: Some("CWE-598"),
            fix: Some("Use cookies for session management instead of URL parameters"),
            confidence: 0.85,
            languages: None,
            sanitizers: &[],
        },
        PatternRule {
            id: "session-002",
            pattern: r#"(?:session|cookie)(?:Secret|Key)\s*[=:]\s*['"][^'"]{8,}['"]"#,
            title: "Hardcoded session secret",
            description: "Session secret is hardcoded in source code",
            severity: Severity::High,
            category: Category::Session,
            cwe_id: Some("CWE-798"),
            fix: Some("Use environment variables for session secrets"),
            confidence: 0.85,
            languages: None,
            sanitizers: &["process.env", "os.environ", "getenv"],
        },
        PatternRule {
            id: "session-003",
            pattern: r"session\(\s*\{[^}]*resave\s*:\s*true",
            title: "Express session with resave enabled",
            description: "Session resave is enabled which can cause race conditions",
            severity: Severity::Low,
            category: Category::Session,
            cwe_id: Some("CWE-613"),
            fix: Some("Set resave: false to prevent unnecessary session saves"),
            confidence: 0.8,
            languages: Some(JS_TS),
            sanitizers: &[],
        },
        PatternRule {
            id: "session-004",
            pattern: r"session\.use_strict_mode\s*=\s*(?:0|false|off)",
            title: "PHP session strict mode disabled",
            description: "Session strict mode is disabled, allowing uninitialized session IDs",
            severity: Severity::Medium,
            category: Category::Session,
            cwe_id: Some("CWE-384"),
            fix: Some("Enable session.use_strict_mode in php.ini"),
            confidence: 0.9,
            languages: None,
            sanitizers: &[],
        },
        PatternRule {
            id: "session-005",
            pattern: r"(?:maxAge|max_age|expires|expiry)\s*[=:]\s*\d{8,}",
            title: "Excessively long session timeout",
            description: "Session timeout is set to a very long duration, increasing risk of session hijacking",
            severity: Severity::Low,
            category: Category::Session,
            cwe_id: Some("CWE-613"),
            fix: Some("Use shorter session timeouts (e.g., 30 minutes for sensitive applications)"),
            confidence: 0.7,
            languages: None,
            sanitizers: &[],
        },
        PatternRule {
            id: "session-006",
            pattern: r#"jwt\.sign\s*\([^,]+,\s*['"][^'"]{1,15}['"]"#,
            title: "JWT secret too short",
            description: "JWT secret appears to be too short (less than 16 characters)",
            severity: Severity::High,
            category: Category::Session,
            cwe_id: Some("CWE-326"),
            fix: Some("Use a strong secret with at least 32 characters"),
            confidence: 0.8,
            languages: Some(JS_TS),
            sanitizers: &[],
        },
        PatternRule {
            id: "session-007",
            pattern: r#"localStorage\.setItem\s*\(\s*['"](?:token|session|auth|jwt|password|secret)"#,
            title: "Sensitive data stored in localStorage",
            description: "Storing sensitive data in localStorage exposes it to XSS attacks",
            severity: Severity::Medium,
            category: Category::Session,
            cwe_id: Some("CWE-922"),
            fix: Some("Use HttpOnly cookies for sensitive tokens instead of localStorage"),
            confidence: 0.85,
            languages: Some(JS_TS),
            sanitizers: &[],
        },
    ]
}

pub fn scanner() -> RuleEngine {
    RuleEngine::new("Session Scanner", rules())
}
