//! Security misconfiguration rules
//!
//! One scanner owning the configuration, authentication, authorization,
//! cryptography and open-redirect categories; individual rules carry their
//! own category, including a few classes (deserialization, mass assignment)
//! that have no dedicated scanner of their own.

use gitscan_core::{Category, Severity};

use crate::engine::{PatternRule, RuleEngine};
use crate::language::Language;

const JS_TS: &[Language] = &[Language::JavaScript, Language::TypeScript];

pub fn rules() -> Vec<PatternRule> {
    vec![
        PatternRule {
            id: "cfg-001",
            pattern: r"(?:DEBUG|debug)\s*[=:]\s*(?:true|1|on)\b",
            title: "Debug mode enabled",
            description: "Debug mode is enabled which may expose sensitive information",
            severity: Severity::Medium,
            category: Category::Configuration,
            cwe_id: Some("CWE-489"),
            fix: Some("Disable debug mode in production environments"),
            confidence: 0.85,
            languages: None,
            sanitizers: &[],
        },
        PatternRule {
            id: "cfg-002",
            pattern: r#"(?:Access-Control-Allow-Origin|cors)[^}\n]*['"]\*['"]"#,
            title: "CORS allows all origins",
            description: "CORS is configured to allow all origins which may enable CSRF attacks",
            severity: Severity::Medium,
            category: Category::Configuration,
            cwe_id: Some("CWE-942"),
            fix: Some("Restrict CORS to specific trusted origins"),
            confidence: 0.8,
            languages: None,
            sanitizers: &[],
        },
        PatternRule {
            id: "cfg-003",
            pattern: r"(?:verify|ssl|tls|certificate)[_\s]*[=:]\s*(?:false|0|none)\b",
            title: "SSL/TLS verification disabled",
            description: "SSL certificate verification is disabled, enabling man-in-the-middle attacks",
            severity: Severity::High,
            category: Category::Cryptography,
            cwe_id: Some("CWE-295"),
            fix: Some("Enable SSL certificate verification"),
            confidence: 0.9,
            languages: None,
            sanitizers: &[],
        },
        PatternRule {
            id: "cfg-004",
            pattern: r"(?:pickle\.loads?|yaml\.load\b|yaml\.unsafe_load|unserialize|ObjectInputStream)\s*\(",
            title: "Potentially insecure deserialization",
            description: "Deserialization of untrusted data can lead to remote code execution",
            severity: Severity::High,
            category: Category::Deserialization,
            cwe_id: Some("CWE-502"),
            fix: Some("Use safe deserialization methods or validate input before deserializing"),
            confidence: 0.8,
            languages: Some(&[Language::Python, Language::Php, Language::Java]),
            sanitizers: &["safe_load", "safeloader"],
        },
        PatternRule {
            id: "cfg-005",
            pattern: r"\b(?:md5|sha1|des|rc4)\s*\(",
            title: "Weak cryptographic algorithm",
            description: "Using weak or deprecated cryptographic algorithm",
            severity: Severity::Medium,
            category: Category::Cryptography,
            cwe_id: Some("CWE-327"),
            fix: Some("Use strong algorithms like SHA-256, AES-256, or bcrypt for passwords"),
            confidence: 0.85,
            languages: None,
            sanitizers: &[],
        },
        PatternRule {
            id: "cfg-006",
            pattern: r#"['"]http://[^'"\s]+['"]"#,
            title: "Hardcoded HTTP URL",
            description: "Using HTTP instead of HTTPS for external URLs",
            severity: Severity::Low,
            category: Category::Configuration,
            cwe_id: Some("CWE-319"),
            fix: Some("Use HTTPS for all external communications"),
            confidence: 0.7,
            languages: None,
            sanitizers: &["localhost", "127.0.0.1", "0.0.0.0", "example.", "w3.org", "schemas."],
        },
        PatternRule {
            id: "cfg-007",
            pattern: r"(?:res\.send|response\.send)\s*\(\s*(?:err|error|exception)\b",
            title: "Exposed error message",
            description: "Error details are sent to the client, potentially exposing sensitive information",
            severity: Severity::Low,
            category: Category::Configuration,
            cwe_id: Some("CWE-209"),
            fix: Some("Log errors server-side and send generic error messages to clients"),
            confidence: 0.7,
            languages: Some(JS_TS),
            sanitizers: &[],
        },
        PatternRule {
            id: "cfg-008",
            pattern: r#"(?:password|passwd|pwd|secret)\s*[=:]\s*['"](?:admin|password|123456|root|default|test)['"]"#,
            title: "Default or weak credentials",
            description: "Default or commonly-used credentials found in code",
            severity: Severity::Critical,
            category: Category::Authentication,
            cwe_id: Some("CWE-798"),
            fix: Some("Remove hardcoded credentials and use environment variables"),
            confidence: 0.9,
            languages: None,
            sanitizers: &[],
        },
        PatternRule {
            id: "cfg-009",
            pattern: r"(?:\.create|\.update|\.updateOne|\.findOneAndUpdate)\s*\(\s*(?:req\.body|request\.body)",
            title: "Potential mass assignment vulnerability",
            description: "User input is directly passed to database operation",
            severity: Severity::Medium,
            category: Category::MassAssignment,
            cwe_id: Some("CWE-915"),
            fix: Some("Whitelist allowed fields instead of passing all user input"),
            confidence: 0.75,
            languages: Some(JS_TS),
            sanitizers: &[],
        },
        PatternRule {
            id: "cfg-010",
            pattern: r"(?:redirect|location\.href|window\.location)\s*[=(]\s*(?:req\.|request\.|params\.|query\.)",
            title: "Potential open redirect",
            description: "Redirect destination is controlled by user input",
            severity: Severity::Medium,
            category: Category::OpenRedirect,
            cwe_id: Some("CWE-601"),
            fix: Some("Validate redirect URLs against a whitelist of allowed destinations"),
            confidence: 0.8,
            languages: None,
            sanitizers: &["whitelist", "allowlist", "validate"],
        },
    ]
}

pub fn scanner() -> RuleEngine {
    RuleEngine::new("Misconfiguration Scanner", rules())
}
