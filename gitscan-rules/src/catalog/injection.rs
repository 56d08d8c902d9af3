//! Injection rules: SQL, command, path traversal, and SSRF
//!
//! One scanner owns all four categories; the roster maps each of them to
//! this engine and runs it once.

use gitscan_core::{Category, Severity};

use crate::engine::{PatternRule, RuleEngine};
use crate::language::Language;

const JS_TS: &[Language] = &[Language::JavaScript, Language::TypeScript];
const PY_JS_TS: &[Language] = &[
    Language::Python,
    Language::JavaScript,
    Language::TypeScript,
];

const SQL_SANITIZERS: &[&str] = &[
    "prepare",
    "parameterized",
    "binding",
    "placeholder",
    "sqlalchemy",
    "sanitize",
    "escape",
];

const COMMAND_SANITIZERS: &[&str] = &[
    "shlex.quote",
    "escapeshellarg",
    "whitelist",
    "allowlist",
    "validate",
    "sanitize",
];

const PATH_SANITIZERS: &[&str] = &[
    "basename",
    "secure_filename",
    "resolve",
    "normalize",
    "realpath",
    "abspath",
    "whitelist",
    "allowlist",
];

const SSRF_SANITIZERS: &[&str] = &["whitelist", "allowlist", "validate_url"];

pub fn rules() -> Vec<PatternRule> {
    vec![
        // SQL injection
        PatternRule {
            id: "inj-001",
            pattern: r#"(?:execute|query|run)\s*\(\s*["'](?:SELECT|INSERT|UPDATE|DELETE)\s+[^"']*["']\s*\+\s*(?:user|input|param|req|request|data)"#,
            title: "SQL Injection via string concatenation with user input",
            description: "SQL query built with string concatenation using user input is vulnerable",
            severity: Severity::Critical,
            category: Category::SqlInjection,
            cwe_id: Some("CWE-89"),
            fix: Some("Use parameterized queries or prepared statements"),
            confidence: 0.9,
            languages: Some(&[
                Language::Python,
                Language::JavaScript,
                Language::TypeScript,
                Language::Java,
            ]),
            sanitizers: SQL_SANITIZERS,
        },
        PatternRule {
            id: "inj-002",
            pattern: r#"cursor\.execute\s*\(\s*f["'](?:SELECT|INSERT|UPDATE|DELETE)"#,
            title: "Python SQL Injection via f-string",
            description: "Using f-strings in SQL queries allows SQL injection",
            severity: Severity::Critical,
            category: Category::SqlInjection,
            cwe_id: Some("CWE-89"),
            fix: Some(
                r#"Use parameterized queries: cursor.execute("SELECT * FROM users WHERE id = %s", (user_id,))"#,
            ),
            confidence: 0.95,
            languages: Some(&[Language::Python]),
            sanitizers: SQL_SANITIZERS,
        },
        PatternRule {
            id: "inj-003",
            pattern: r"\.(?:query|execute)\s*\(\s*`[^`]*(?:SELECT|INSERT|UPDATE|DELETE)[^`]*\$\{(?:req|user|input|param)",
            title: "JavaScript SQL Injection via template literal with user input",
            description: "Using template literals with user input in SQL queries allows SQL injection",
            severity: Severity::Critical,
            category: Category::SqlInjection,
            cwe_id: Some("CWE-89"),
            fix: Some(
                r#"Use parameterized queries with placeholders: query("SELECT * FROM users WHERE id = $1", [userId])"#,
            ),
            confidence: 0.9,
            languages: Some(JS_TS),
            sanitizers: SQL_SANITIZERS,
        },
        PatternRule {
            id: "inj-004",
            pattern: r"(?:mysql_query|mysqli_query|pg_query)\s*\([^)]*\$_(?:GET|POST|REQUEST)\s*\[",
            title: "PHP SQL Injection with user input",
            description: "User input from $_GET/$_POST directly used in SQL query",
            severity: Severity::Critical,
            category: Category::SqlInjection,
            cwe_id: Some("CWE-89"),
            fix: Some(
                r#"Use prepared statements with PDO: $stmt = $pdo->prepare("SELECT * FROM users WHERE id = ?");"#,
            ),
            confidence: 0.95,
            languages: Some(&[Language::Php]),
            sanitizers: SQL_SANITIZERS,
        },
        PatternRule {
            id: "inj-005",
            pattern: r#"(?:executeQuery|createQuery|nativeQuery)\s*\(\s*["'][^"']*["']\s*\+\s*(?:user|input|request)"#,
            title: "Java SQL Injection via concatenation",
            description: "SQL query built with string concatenation is vulnerable",
            severity: Severity::Critical,
            category: Category::SqlInjection,
            cwe_id: Some("CWE-89"),
            fix: Some("Use PreparedStatement with parameterized queries"),
            confidence: 0.9,
            languages: Some(&[Language::Java]),
            sanitizers: SQL_SANITIZERS,
        },
        // Command injection
        PatternRule {
            id: "inj-006",
            pattern: r"os\.system\s*\([^)]*(?:\+|\.format\(|%s)[^)]*(?:user|input|param|request|data)",
            title: "Command Injection via os.system with user input",
            description: "Using os.system with user-controlled input allows command injection",
            severity: Severity::Critical,
            category: Category::CommandInjection,
            cwe_id: Some("CWE-78"),
            fix: Some(
                r#"Use subprocess.run with a list of arguments: subprocess.run(["cmd", arg1, arg2])"#,
            ),
            confidence: 0.9,
            languages: Some(&[Language::Python]),
            sanitizers: COMMAND_SANITIZERS,
        },
        PatternRule {
            id: "inj-007",
            pattern: r#"subprocess\.(?:call|run|Popen)\s*\([^)]*shell\s*=\s*True[^)]*(?:user|input|param|request|f["'])"#,
            title: "Subprocess with shell=True and dynamic input",
            description: "Using shell=True with user-controlled input leads to command injection",
            severity: Severity::Critical,
            category: Category::CommandInjection,
            cwe_id: Some("CWE-78"),
            fix: Some("Use shell=False and pass command as a list of arguments"),
            confidence: 0.9,
            languages: Some(&[Language::Python]),
            sanitizers: COMMAND_SANITIZERS,
        },
        PatternRule {
            id: "inj-008",
            pattern: r"child_process\.exec\s*\([^)]*(?:\+|`[^`]*\$\{)[^)]*(?:user|input|req|param)",
            title: "Node.js Command Injection via exec",
            description: "Using child_process.exec with user input allows command injection",
            severity: Severity::Critical,
            category: Category::CommandInjection,
            cwe_id: Some("CWE-78"),
            fix: Some("Use child_process.execFile or spawn with an array of arguments"),
            confidence: 0.9,
            languages: Some(JS_TS),
            sanitizers: COMMAND_SANITIZERS,
        },
        PatternRule {
            id: "inj-009",
            pattern: r"Runtime\.getRuntime\(\)\.exec\s*\([^)]*\+[^)]*(?:user|input|request|param)",
            title: "Java Command Injection via Runtime.exec",
            description: "Runtime.exec with user-controlled input allows command injection",
            severity: Severity::Critical,
            category: Category::CommandInjection,
            cwe_id: Some("CWE-78"),
            fix: Some("Use ProcessBuilder with a list of arguments"),
            confidence: 0.9,
            languages: Some(&[Language::Java]),
            sanitizers: COMMAND_SANITIZERS,
        },
        PatternRule {
            id: "inj-010",
            pattern: r"(?:system|passthru|exec|shell_exec)\s*\([^)]*\$_(?:GET|POST|REQUEST)",
            title: "PHP Command Injection",
            description: "PHP command execution with direct user input",
            severity: Severity::Critical,
            category: Category::CommandInjection,
            cwe_id: Some("CWE-78"),
            fix: Some("Avoid shell commands with user input. Use escapeshellarg() if necessary"),
            confidence: 0.95,
            languages: Some(&[Language::Php]),
            sanitizers: COMMAND_SANITIZERS,
        },
        // Path traversal
        PatternRule {
            id: "inj-011",
            pattern: r#"(?:open|readFile|readFileSync|writeFile)\s*\([^)]*(?:\+|\.format\(|f["']|`[^`]*\$\{)[^)]*(?:user|input|param|req|request|filename|path)"#,
            title: "Path Traversal via user-controlled file path",
            description: "File path built with user input may allow path traversal",
            severity: Severity::High,
            category: Category::PathTraversal,
            cwe_id: Some("CWE-22"),
            fix: Some(
                "Validate file paths with os.path.basename() or path.resolve() and ensure they stay within allowed directories",
            ),
            confidence: 0.85,
            languages: Some(PY_JS_TS),
            sanitizers: PATH_SANITIZERS,
        },
        PatternRule {
            id: "inj-012",
            pattern: r#"send_file\s*\([^)]*(?:\+|\.format\(|f["'])[^)]*(?:user|filename|request)"#,
            title: "Flask send_file with user-controlled path",
            description: "Using user input in send_file allows arbitrary file access",
            severity: Severity::High,
            category: Category::PathTraversal,
            cwe_id: Some("CWE-22"),
            fix: Some("Validate file path and use secure_filename() from werkzeug.utils"),
            confidence: 0.9,
            languages: Some(&[Language::Python]),
            sanitizers: PATH_SANITIZERS,
        },
        PatternRule {
            id: "inj-013",
            pattern: r"res\.sendFile\s*\([^)]*(?:\+|`[^`]*\$\{)[^)]*(?:user|req|param)",
            title: "Express sendFile with user-controlled path",
            description: "Using user input in sendFile allows arbitrary file access",
            severity: Severity::High,
            category: Category::PathTraversal,
            cwe_id: Some("CWE-22"),
            fix: Some("Validate file path with path.resolve() and ensure it stays within allowed directory"),
            confidence: 0.9,
            languages: Some(JS_TS),
            sanitizers: PATH_SANITIZERS,
        },
        // SSRF
        PatternRule {
            id: "inj-014",
            pattern: r"requests\.(?:get|post|put|delete)\s*\([^)]*(?:request\.(?:args|form|json)|user_input)",
            title: "Python SSRF via user-controlled URL",
            description: "Outbound request target is taken from user input",
            severity: Severity::High,
            category: Category::Ssrf,
            cwe_id: Some("CWE-918"),
            fix: Some("Validate the URL against an allowlist of hosts before requesting it"),
            confidence: 0.8,
            languages: Some(&[Language::Python]),
            sanitizers: SSRF_SANITIZERS,
        },
        PatternRule {
            id: "inj-015",
            pattern: r"(?:axios|fetch)\s*\(\s*(?:req\.(?:query|params|body)|user|input)",
            title: "Node.js SSRF via user-controlled URL",
            description: "Outbound request target is taken from user input",
            severity: Severity::High,
            category: Category::Ssrf,
            cwe_id: Some("CWE-918"),
            fix: Some("Validate the URL against an allowlist of hosts before requesting it"),
            confidence: 0.8,
            languages: Some(JS_TS),
            sanitizers: SSRF_SANITIZERS,
        },
    ]
}

pub fn scanner() -> RuleEngine {
    RuleEngine::new("Injection Scanner", rules())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitscan_core::FileScanner;

    #[test]
    fn detects_fstring_sql() {
        let content = "cursor.execute(f\"SELECT * FROM users WHERE id = {uid}\")\n";
        let findings = scanner().scan(content, "src/db.py").unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, Category::SqlInjection);
        assert_eq!(findings[0].severity, Severity::Critical);
    }

    #[test]
    fn detects_shell_true_subprocess() {
        let content = "subprocess.run(cmd, shell=True, input=user_args)\n";
        let findings = scanner().scan(content, "src/runner.py").unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, Category::CommandInjection);
    }

    #[test]
    fn parameterized_query_nearby_is_suppressed() {
        let content = "stmt = prepare(sql)\ncursor.execute(f\"SELECT * FROM t WHERE id={x}\")\n";
        assert!(scanner().scan(content, "src/db.py").unwrap().is_empty());
    }
}
