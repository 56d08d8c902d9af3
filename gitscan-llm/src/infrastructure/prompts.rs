//! Prompt templates and tolerant response parsing
//!
//! Every backend shares these, so a provider swap never changes the fix
//! contract. Parsing is deliberately forgiving: models wrap JSON in
//! markdown fences or prose, and a fix we can only partially parse is still
//! worth returning at reduced confidence.

use regex::Regex;
use tracing::debug;

use crate::domain::fix::{FixRequest, FixResponse, SnippetAnalysis};

pub const CODE_FIX_SYSTEM_PROMPT: &str = r#"You are an expert security engineer specializing in identifying and fixing security vulnerabilities in code.

Your task is to:
1. Analyze the provided vulnerable code snippet
2. Understand the security vulnerability described
3. Generate a secure fix that eliminates the vulnerability
4. Explain your fix clearly and concisely

Guidelines:
- Maintain the original code's functionality while fixing the security issue
- Follow security best practices for the given programming language
- Provide clean, production-ready code
- Include any necessary imports or dependencies in your fix
- Be concise but thorough in your explanation

IMPORTANT: Your response must be in the following JSON format:
{
    "fixed_code": "the complete fixed code snippet",
    "explanation": "brief explanation of the fix and why it resolves the vulnerability",
    "confidence": 0.95
}

The confidence should be a number between 0 and 1 indicating how confident you are in the fix."#;

/// User prompt for a fix request.
pub fn fix_user_prompt(request: &FixRequest) -> String {
    let mut prompt = format!(
        "Please fix the following security vulnerability:\n\n\
         ## Vulnerability Information\n\
         - **Title**: {}\n\
         - **Category**: {}\n\
         - **Description**: {}\n",
        request.title, request.category, request.description
    );

    if let Some(cwe) = &request.cwe_id {
        prompt.push_str(&format!("- **CWE**: {}\n", cwe));
    }

    prompt.push_str(&format!(
        "\n## File Information\n\
         - **File**: {}\n\
         - **Language**: {}\n\
         \n## Vulnerable Code\n```{}\n{}\n```\n",
        request.file_path, request.language, request.language, request.code_snippet
    ));

    if let Some(suggestion) = &request.suggested_fix {
        prompt.push_str(&format!("\n## Initial Suggestion\n{}\n", suggestion));
    }
    if let Some(context) = &request.context {
        prompt.push_str(&format!("\n## Additional Context\n{}\n", context));
    }

    prompt.push_str("\nPlease provide the fixed code and explanation in the JSON format specified.");
    prompt
}

/// Prompt for snippet analysis.
pub fn analysis_prompt(code: &str, language: &str, context: Option<&str>) -> String {
    let context_block = context
        .filter(|c| !c.is_empty())
        .map(|c| format!("Context: {}\n\n", c))
        .unwrap_or_default();

    format!(
        "Analyze the following {language} code for security vulnerabilities.\n\n\
         ```{language}\n{code}\n```\n\n\
         {context_block}\
         Provide your analysis in the following JSON format:\n\
         {{\n\
         \x20   \"vulnerabilities\": [\n\
         \x20       {{\n\
         \x20           \"title\": \"Brief title\",\n\
         \x20           \"severity\": \"CRITICAL\" | \"HIGH\" | \"MEDIUM\" | \"LOW\",\n\
         \x20           \"category\": \"XSS\" | \"SQL_INJECTION\" | \"etc\",\n\
         \x20           \"description\": \"Detailed description\",\n\
         \x20           \"line_numbers\": [1, 2],\n\
         \x20           \"suggested_fix\": \"How to fix it\"\n\
         \x20       }}\n\
         \x20   ],\n\
         \x20   \"summary\": \"Overall security assessment\",\n\
         \x20   \"risk_score\": 0\n\
         }}"
    )
}

/// Parse a model's fix response, tolerating markdown fences and prose.
pub fn parse_fix_response(
    text: &str,
    provider: &str,
    model: &str,
    tokens_used: u32,
) -> FixResponse {
    #[derive(serde::Deserialize)]
    struct RawFix {
        #[serde(default)]
        fixed_code: String,
        #[serde(default)]
        explanation: String,
        #[serde(default)]
        confidence: Option<f64>,
    }

    if let Some(json) = extract_json(text) {
        if let Ok(raw) = serde_json::from_str::<RawFix>(&json) {
            return FixResponse {
                fixed_code: raw.fixed_code,
                explanation: raw.explanation,
                confidence: raw.confidence.unwrap_or(0.8).clamp(0.0, 1.0),
                provider: provider.to_string(),
                model: model.to_string(),
                tokens_used,
            };
        }
    }

    debug!(provider, "Falling back to unstructured fix parsing");
    let code_block = Regex::new(r"(?s)```\w*\n(.*?)```")
        .ok()
        .and_then(|re| re.captures(text).map(|c| c[1].trim().to_string()));

    FixResponse {
        fixed_code: code_block.unwrap_or_else(|| text.trim().to_string()),
        explanation: "Fix generated (unable to parse structured response)".to_string(),
        confidence: 0.6,
        provider: provider.to_string(),
        model: model.to_string(),
        tokens_used,
    }
}

/// Parse a snippet analysis, falling back to the raw text as the summary.
pub fn parse_analysis(text: &str) -> SnippetAnalysis {
    if let Some(json) = extract_json(text) {
        if let Ok(analysis) = serde_json::from_str::<SnippetAnalysis>(&json) {
            return analysis;
        }
    }

    SnippetAnalysis {
        vulnerabilities: Vec::new(),
        summary: text.trim().to_string(),
        risk_score: None,
    }
}

/// Pull the first JSON object out of a response: fenced block first, then
/// the outermost brace span.
fn extract_json(text: &str) -> Option<String> {
    if let Ok(re) = Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```") {
        if let Some(captures) = re.captures(text) {
            return Some(captures[1].to_string());
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(text[start..=end].to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> FixRequest {
        FixRequest {
            title: "XSS via innerHTML".to_string(),
            description: "User input flows into innerHTML".to_string(),
            category: "XSS".to_string(),
            file_path: "src/app.js".to_string(),
            code_snippet: "el.innerHTML = input;".to_string(),
            language: "javascript".to_string(),
            cwe_id: Some("CWE-79".to_string()),
            suggested_fix: None,
            context: None,
        }
    }

    #[test]
    fn fix_prompt_includes_vulnerability_details() {
        let prompt = fix_user_prompt(&request());
        assert!(prompt.contains("XSS via innerHTML"));
        assert!(prompt.contains("**CWE**: CWE-79"));
        assert!(prompt.contains("```javascript"));
        assert!(!prompt.contains("## Initial Suggestion"));
    }

    #[test]
    fn parses_fenced_json_fix() {
        let text = "Here you go:\n```json\n{\"fixed_code\": \"el.textContent = input;\", \"explanation\": \"textContent is inert\", \"confidence\": 0.93}\n```";
        let response = parse_fix_response(text, "OPENAI", "gpt-4", 120);
        assert_eq!(response.fixed_code, "el.textContent = input;");
        assert_eq!(response.confidence, 0.93);
        assert_eq!(response.tokens_used, 120);
    }

    #[test]
    fn parses_bare_json_fix() {
        let text = "{\"fixed_code\": \"x\", \"explanation\": \"y\", \"confidence\": 0.9}";
        let response = parse_fix_response(text, "ANTHROPIC", "claude", 0);
        assert_eq!(response.fixed_code, "x");
        assert_eq!(response.explanation, "y");
    }

    #[test]
    fn unparseable_fix_falls_back_to_code_block() {
        let text = "I'd suggest:\n```js\nconst safe = escapeHtml(input);\n```\nthat should do it";
        let response = parse_fix_response(text, "OPENAI", "gpt-4", 0);
        assert_eq!(response.fixed_code, "const safe = escapeHtml(input);");
        assert_eq!(response.confidence, 0.6);
    }

    #[test]
    fn parses_analysis_json() {
        let text = r#"{"vulnerabilities": [{"title": "SQLi", "severity": "HIGH", "category": "SQL_INJECTION", "description": "d", "line_numbers": [3]}], "summary": "risky", "risk_score": 70}"#;
        let analysis = parse_analysis(text);
        assert_eq!(analysis.vulnerabilities.len(), 1);
        assert_eq!(analysis.vulnerabilities[0].title, "SQLi");
        assert_eq!(analysis.risk_score, Some(70.0));
    }

    #[test]
    fn unparseable_analysis_keeps_raw_text_as_summary() {
        let analysis = parse_analysis("the model rambled");
        assert!(analysis.vulnerabilities.is_empty());
        assert_eq!(analysis.summary, "the model rambled");
    }
}
