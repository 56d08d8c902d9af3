//! Source language inference from file extensions

/// Languages the pattern rules can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Java,
    Go,
    Ruby,
    Php,
    CSharp,
    C,
    Cpp,
    Swift,
    Kotlin,
    Rust,
    Sql,
    Html,
    Xml,
    Json,
    Yaml,
}

impl Language {
    /// Infer the language from a file path's extension. Returns `None` for
    /// unrecognised extensions; rules restricted to specific languages are
    /// still applied to such files only when they carry no restriction.
    pub fn from_path(path: &str) -> Option<Language> {
        let extension = path.rsplit('.').next()?.to_ascii_lowercase();
        let language = match extension.as_str() {
            "js" | "jsx" | "mjs" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "py" => Language::Python,
            "java" => Language::Java,
            "go" => Language::Go,
            "rb" => Language::Ruby,
            "php" => Language::Php,
            "cs" => Language::CSharp,
            "c" | "h" => Language::C,
            "cpp" | "hpp" | "cc" => Language::Cpp,
            "swift" => Language::Swift,
            "kt" | "kts" => Language::Kotlin,
            "rs" => Language::Rust,
            "sql" => Language::Sql,
            "html" | "htm" => Language::Html,
            "xml" => Language::Xml,
            "json" => Language::Json,
            "yaml" | "yml" => Language::Yaml,
            _ => return None,
        };
        Some(language)
    }
}
