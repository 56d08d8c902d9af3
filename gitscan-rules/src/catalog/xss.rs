//! Cross-site scripting rules

use gitscan_core::{Category, Severity};

use crate::engine::{PatternRule, RuleEngine};
use crate::language::Language;

const JS_TS: &[Language] = &[Language::JavaScript, Language::TypeScript];

/// Sanitization helpers whose presence near a match marks it as handled.
const SANITIZERS: &[&str] = &[
    "dompurify",
    "sanitize",
    "escape",
    "encode",
    "htmlspecialchars",
    "htmlentities",
    "strip_tags",
    "bleach.clean",
    "markupsafe",
    "purify",
];

pub fn rules() -> Vec<PatternRule> {
    vec![
        PatternRule {
            id: "xss-001",
            pattern: r"\.innerHTML\s*=\s*[^;]*(?:user|input|param|query|req\.|request|data\[)",
            title: "Potential XSS via innerHTML with user input",
            description: "Direct assignment to innerHTML with user input can lead to XSS",
            severity: Severity::High,
            category: Category::Xss,
            cwe_id: Some("CWE-79"),
            fix: Some("Use textContent for plain text, or sanitize HTML input with DOMPurify"),
            confidence: 0.85,
            languages: Some(JS_TS),
            sanitizers: SANITIZERS,
        },
        PatternRule {
            id: "xss-002",
            pattern: r"dangerouslySetInnerHTML\s*=\s*\{\s*\{\s*__html\s*:",
            title: "React dangerouslySetInnerHTML without sanitization",
            description: "dangerouslySetInnerHTML used without visible sanitization",
            severity: Severity::Medium,
            category: Category::Xss,
            cwe_id: Some("CWE-79"),
            fix: Some("Sanitize HTML content with DOMPurify before using dangerouslySetInnerHTML"),
            confidence: 0.75,
            languages: Some(JS_TS),
            sanitizers: SANITIZERS,
        },
        PatternRule {
            id: "xss-003",
            pattern: r"document\.write\s*\([^)]*(?:user|input|param|query|location|document\.URL)",
            title: "document.write with user-controlled data",
            description: "document.write with user-controlled data leads to XSS",
            severity: Severity::Critical,
            category: Category::Xss,
            cwe_id: Some("CWE-79"),
            fix: Some("Use DOM manipulation methods like createElement and appendChild"),
            confidence: 0.9,
            languages: Some(JS_TS),
            sanitizers: SANITIZERS,
        },
        PatternRule {
            id: "xss-004",
            pattern: r"eval\s*\(\s*[^)]*(?:\+\s*(?:user|input|param|req|request)|\$\{)",
            title: "Eval with user-controlled input",
            description: "Using eval with user input allows code injection",
            severity: Severity::Critical,
            category: Category::Xss,
            cwe_id: Some("CWE-95"),
            fix: Some("Avoid eval entirely. Use JSON.parse for data or safer alternatives"),
            confidence: 0.9,
            languages: Some(JS_TS),
            sanitizers: SANITIZERS,
        },
        PatternRule {
            id: "xss-005",
            pattern: r"\$\([^)]+\)\.html\s*\(\s*(?:user|input|data|response|ajax)",
            title: "jQuery html() with dynamic user content",
            description: "Using jQuery html() with user-controlled content leads to XSS",
            severity: Severity::High,
            category: Category::Xss,
            cwe_id: Some("CWE-79"),
            fix: Some("Use .text() for plain text or sanitize input before .html()"),
            confidence: 0.85,
            languages: Some(JS_TS),
            sanitizers: SANITIZERS,
        },
        PatternRule {
            id: "xss-006",
            pattern: r#"render_template_string\s*\([^)]*(?:request\.|user_input|%s|\.format\()"#,
            title: "Flask render_template_string with user input",
            description: "Using user input in render_template_string leads to SSTI/XSS",
            severity: Severity::Critical,
            category: Category::Xss,
            cwe_id: Some("CWE-79"),
            fix: Some("Use render_template with separate files and pass variables safely"),
            confidence: 0.95,
            languages: Some(&[Language::Python]),
            sanitizers: SANITIZERS,
        },
        PatternRule {
            id: "xss-007",
            pattern: r#"echo\s+\$_(?:GET|POST|REQUEST|COOKIE)\s*\[\s*['"][^'"]+['"]\s*\]"#,
            title: "PHP echo with unsanitized user input",
            description: "Directly echoing user input without encoding leads to XSS",
            severity: Severity::Critical,
            category: Category::Xss,
            cwe_id: Some("CWE-79"),
            fix: Some(r#"Use htmlspecialchars($_GET["param"], ENT_QUOTES, "UTF-8")"#),
            confidence: 0.95,
            languages: Some(&[Language::Php]),
            sanitizers: SANITIZERS,
        },
        PatternRule {
            id: "xss-008",
            pattern: r"\{\{\s*(?:user|input|request|data)[^}]*\|\s*safe\s*\}\}",
            title: "Jinja2 |safe filter on user input",
            description: "Using |safe filter on user input bypasses auto-escaping",
            severity: Severity::High,
            category: Category::Xss,
            cwe_id: Some("CWE-79"),
            fix: Some("Remove |safe filter or sanitize the content first"),
            confidence: 0.9,
            languages: Some(&[Language::Python, Language::Html]),
            sanitizers: &[],
        },
    ]
}

pub fn scanner() -> RuleEngine {
    RuleEngine::new("XSS Scanner", rules())
}
