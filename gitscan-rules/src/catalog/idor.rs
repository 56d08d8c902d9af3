//! Insecure direct object reference rules

use gitscan_core::{Category, Severity};

use crate::engine::{PatternRule, RuleEngine};
use crate::language::Language;

const PY_JS_TS: &[Language] = &[
    Language::Python,
    Language::JavaScript,
    Language::TypeScript,
];

/// Authorization helpers whose presence near a match marks it as checked.
const AUTH_CHECKS: &[&str] = &[
    "authorize",
    "permission",
    "owner",
    "current_user",
    "can_access",
    "acl",
    "verify",
];

pub fn rules() -> Vec<PatternRule> {
    vec![
        PatternRule {
            id: "idor-001",
            pattern: r"(?:findById|findOne|findByPk)\s*\(\s*(?:req\.params|req\.query|req\.body|request\.get|params\[)",
            title: "Potential IDOR - Direct object access by ID",
            description: "Object is fetched directly using ID from user input without ownership verification",
            severity: Severity::High,
            category: Category::Idor,
            cwe_id: Some("CWE-639"),
            fix: Some("Verify that the current user owns or has permission to access the requested object"),
            confidence: 0.7,
            languages: Some(PY_JS_TS),
            sanitizers: AUTH_CHECKS,
        },
        PatternRule {
            id: "idor-002",
            pattern: r"(?:readFile|writeFile|unlink|remove)\s*\([^)]*(?:req\.|request\.|params\.|query\.)",
            title: "Potential IDOR - File operation with user input",
            description: "File operation uses user-provided path or identifier",
            severity: Severity::High,
            category: Category::Idor,
            cwe_id: Some("CWE-639"),
            fix: Some("Validate file paths and ensure user has permission to access the file"),
            confidence: 0.8,
            languages: Some(PY_JS_TS),
            sanitizers: AUTH_CHECKS,
        },
        PatternRule {
            id: "idor-003",
            pattern: r#"\$_(?:GET|POST|REQUEST)\s*\[['"]id['"]\][^\n]*(?:SELECT|UPDATE|DELETE)"#,
            title: "Potential IDOR - Direct SQL with user ID",
            description: "Database query uses ID directly from user input without authorization check",
            severity: Severity::High,
            category: Category::Idor,
            cwe_id: Some("CWE-639"),
            fix: Some("Verify user ownership before performing database operations"),
            confidence: 0.8,
            languages: Some(&[Language::Php]),
            sanitizers: AUTH_CHECKS,
        },
        PatternRule {
            id: "idor-004",
            pattern: r"(?:\.objects\.get|\.query\.get|\.filter_by)\s*\(\s*(?:id|pk)\s*=\s*(?:request\.|kwargs)",
            title: "Potential IDOR - Direct object query",
            description: "Object is retrieved using ID from request without ownership check",
            severity: Severity::Medium,
            category: Category::Idor,
            cwe_id: Some("CWE-639"),
            fix: Some("Filter by both ID and current user: Model.objects.get(id=id, user=request.user)"),
            confidence: 0.7,
            languages: Some(&[Language::Python]),
            sanitizers: AUTH_CHECKS,
        },
        PatternRule {
            id: "idor-005",
            pattern: r"repository\.findById\s*\(\s*(?:request|param)",
            title: "Potential IDOR - Direct repository access",
            description: "Repository findById called with user-provided ID without authorization",
            severity: Severity::Medium,
            category: Category::Idor,
            cwe_id: Some("CWE-639"),
            fix: Some("Verify user has permission to access this entity before returning"),
            confidence: 0.7,
            languages: Some(&[Language::Java]),
            sanitizers: AUTH_CHECKS,
        },
        PatternRule {
            id: "idor-006",
            pattern: r"(?:auto_increment|SERIAL|nextval|IDENTITY)",
            title: "Sequential IDs may enable enumeration",
            description: "Using sequential IDs makes it easier to enumerate resources",
            severity: Severity::Low,
            category: Category::Idor,
            cwe_id: Some("CWE-639"),
            fix: Some("Consider using UUIDs for public-facing identifiers"),
            confidence: 0.5,
            languages: None,
            sanitizers: &[],
        },
        PatternRule {
            id: "idor-007",
            pattern: r"(?:download|export|attachment)\s*[=(][^)\n]*(?:req\.|request\.|params\.)",
            title: "Potential IDOR - Download/Export with user ID",
            description: "File download or export uses user-provided identifier",
            severity: Severity::High,
            category: Category::Idor,
            cwe_id: Some("CWE-639"),
            fix: Some("Verify user has permission to download the requested file"),
            confidence: 0.75,
            languages: None,
            sanitizers: AUTH_CHECKS,
        },
    ]
}

pub fn scanner() -> RuleEngine {
    RuleEngine::new("IDOR Scanner", rules())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitscan_core::FileScanner;

    #[test]
    fn detects_direct_object_access() {
        let content = "const doc = await Document.findById(req.params.id);\n";
        let findings = scanner().scan(content, "src/routes/docs.js").unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, Category::Idor);
    }

    #[test]
    fn ownership_check_nearby_is_suppressed() {
        let content =
            "await authorize(user, doc);\nconst doc = await Document.findById(req.params.id);\n";
        assert!(scanner().scan(content, "src/routes/docs.js").unwrap().is_empty());
    }
}
