//! Cross-site request forgery rules

use gitscan_core::{Category, Severity};

use crate::engine::{PatternRule, RuleEngine};
use crate::language::Language;

pub fn rules() -> Vec<PatternRule> {
    vec![
        PatternRule {
            id: "csrf-001",
            pattern: r"@csrf_exempt",
            title: "Django CSRF protection disabled",
            description: "csrf_exempt decorator disables CSRF protection for this view",
            severity: Severity::High,
            category: Category::Csrf,
            cwe_id: Some("CWE-352"),
            fix: Some("Remove @csrf_exempt and ensure CSRF tokens are included in forms"),
            confidence: 0.95,
            languages: Some(&[Language::Python]),
            sanitizers: &[],
        },
        PatternRule {
            id: "csrf-002",
            pattern: r"WTF_CSRF_ENABLED\s*=\s*False",
            title: "Flask-WTF CSRF protection disabled",
            description: "CSRF protection is explicitly disabled in Flask configuration",
            severity: Severity::High,
            category: Category::Csrf,
            cwe_id: Some("CWE-352"),
            fix: Some("Set WTF_CSRF_ENABLED = True and use CSRFProtect(app)"),
            confidence: 0.95,
            languages: Some(&[Language::Python]),
            sanitizers: &[],
        },
        PatternRule {
            id: "csrf-003",
            pattern: r"\.csrf\(\)\s*\.disable\(\)",
            title: "Spring Security CSRF protection disabled",
            description: "CSRF protection is disabled in Spring Security configuration",
            severity: Severity::High,
            category: Category::Csrf,
            cwe_id: Some("CWE-352"),
            fix: Some("Remove .csrf().disable() to enable CSRF protection"),
            confidence: 0.95,
            languages: Some(&[Language::Java]),
            sanitizers: &[],
        },
        PatternRule {
            id: "csrf-004",
            pattern: r"skip_before_action\s*:verify_authenticity_token",
            title: "Rails CSRF verification skipped",
            description: "CSRF authenticity token verification is being skipped",
            severity: Severity::High,
            category: Category::Csrf,
            cwe_id: Some("CWE-352"),
            fix: Some("Remove skip_before_action for verify_authenticity_token"),
            confidence: 0.95,
            languages: Some(&[Language::Ruby]),
            sanitizers: &[],
        },
        PatternRule {
            id: "csrf-005",
            pattern: r#"\$except\s*=\s*\[[^\]]*['"][^'"]+['"]"#,
            title: "Laravel CSRF middleware exceptions",
            description: "Routes are excluded from CSRF verification in VerifyCsrfToken middleware",
            severity: Severity::Medium,
            category: Category::Csrf,
            cwe_id: Some("CWE-352"),
            fix: Some("Minimize CSRF exceptions and use API tokens for legitimate API routes"),
            confidence: 0.8,
            languages: Some(&[Language::Php]),
            sanitizers: &[],
        },
    ]
}

pub fn scanner() -> RuleEngine {
    RuleEngine::new("CSRF Scanner", rules())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitscan_core::FileScanner;

    #[test]
    fn detects_csrf_exempt_decorator() {
        let content = "@csrf_exempt\ndef update_profile(request):\n    pass\n";
        let findings = scanner().scan(content, "app/views.py").unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, Category::Csrf);
        assert_eq!(findings[0].rule_id.as_deref(), Some("csrf-001"));
    }
}
