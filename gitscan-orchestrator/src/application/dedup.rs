//! Finding deduplication and ranking
//!
//! Tool-backed scanners have a lower false-positive rate than pattern
//! scanners, so when both report the same location the tool finding wins.
//! Very high-confidence pattern findings (secret matches) are kept even when
//! they overlap, since they are complementary rather than duplicative. This
//! is a three-tier confidence policy, not plain set deduplication: pattern
//! rules favour recall, tool findings favour precision, and location-only
//! dedup would either over-suppress secret matches or under-suppress noisy
//! heuristics.

use std::collections::HashSet;

use gitscan_core::{Category, Finding};
use tracing::debug;

/// Confidence assumed for pattern findings that carry none.
const DEFAULT_CONFIDENCE: f64 = 0.7;
/// At or above this confidence a pattern finding is kept unconditionally.
const KEEP_ALWAYS_CONFIDENCE: f64 = 0.95;
/// Below this confidence a coarse (file, category) overlap discards the
/// pattern finding.
const COARSE_SUPPRESS_CONFIDENCE: f64 = 0.85;

/// Merge tool findings and pattern findings into one ordered, duplicate-free
/// list: tool findings first, surviving pattern findings after, the whole
/// sorted by severity, then file path, then start line (stable).
pub fn dedupe_and_rank(
    tool_findings: Vec<Finding>,
    pattern_findings: Vec<Finding>,
) -> Vec<Finding> {
    let exact: HashSet<(&str, u32, Category)> = tool_findings
        .iter()
        .map(|f| (f.file_path.as_str(), f.start_line, f.category))
        .collect();

    let coarse: HashSet<(&str, Category)> = tool_findings
        .iter()
        .map(|f| (f.file_path.as_str(), f.category))
        .collect();

    let mut survivors = Vec::new();
    for finding in &pattern_findings {
        let key = (finding.file_path.as_str(), finding.start_line, finding.category);
        if exact.contains(&key) {
            debug!(
                file = %finding.file_path,
                line = finding.start_line,
                "Skipping duplicate (exact match)"
            );
            continue;
        }

        let confidence = finding.fix_confidence.unwrap_or(DEFAULT_CONFIDENCE);
        if confidence >= KEEP_ALWAYS_CONFIDENCE {
            survivors.push(finding.clone());
            continue;
        }

        let coarse_key = (finding.file_path.as_str(), finding.category);
        if coarse.contains(&coarse_key) && confidence < COARSE_SUPPRESS_CONFIDENCE {
            debug!(
                file = %finding.file_path,
                category = %finding.category,
                "Skipping low-confidence duplicate"
            );
            continue;
        }

        survivors.push(finding.clone());
    }

    let mut merged = tool_findings;
    merged.extend(survivors);

    // Vec::sort_by is stable, so ties beyond the three keys preserve the
    // tool-first concatenation order.
    merged.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.file_path.cmp(&b.file_path))
            .then_with(|| a.start_line.cmp(&b.start_line))
    });

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitscan_core::Severity;

    fn finding(
        file: &str,
        line: u32,
        category: Category,
        severity: Severity,
        confidence: Option<f64>,
    ) -> Finding {
        let mut f = Finding::new(
            format!("{} at {}:{}", category, file, line),
            "test finding",
            severity,
            category,
            file,
            line,
            line,
        );
        if let Some(c) = confidence {
            f = f.with_confidence(c);
        }
        f
    }

    #[test]
    fn exact_location_duplicate_keeps_only_the_tool_finding() {
        let tool = vec![finding(
            "a.py",
            10,
            Category::SqlInjection,
            Severity::Critical,
            None,
        )];
        let pattern = vec![finding(
            "a.py",
            10,
            Category::SqlInjection,
            Severity::High,
            Some(0.8),
        )];

        let merged = dedupe_and_rank(tool, pattern);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].severity, Severity::Critical);
    }

    #[test]
    fn high_confidence_secret_survives_coarse_overlap() {
        let tool = vec![finding(
            "a.py",
            10,
            Category::SecretsExposure,
            Severity::Critical,
            None,
        )];
        let pattern = vec![finding(
            "a.py",
            55,
            Category::SecretsExposure,
            Severity::Critical,
            Some(0.97),
        )];

        let merged = dedupe_and_rank(tool, pattern);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn low_confidence_coarse_overlap_is_discarded() {
        let tool = vec![finding("a.py", 10, Category::Xss, Severity::High, None)];
        let pattern = vec![finding("a.py", 80, Category::Xss, Severity::Medium, Some(0.6))];

        let merged = dedupe_and_rank(tool, pattern);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].start_line, 10);
    }

    #[test]
    fn mid_confidence_coarse_overlap_survives() {
        // 0.85 <= confidence < 0.95: overlap alone is not enough to discard.
        let tool = vec![finding("a.py", 10, Category::Xss, Severity::High, None)];
        let pattern = vec![finding("a.py", 80, Category::Xss, Severity::High, Some(0.9))];

        let merged = dedupe_and_rank(tool, pattern);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn unset_confidence_defaults_to_point_seven() {
        let tool = vec![finding("a.py", 10, Category::Xss, Severity::High, None)];
        let pattern = vec![finding("a.py", 80, Category::Xss, Severity::High, None)];

        // 0.7 < 0.85 with a coarse overlap: discarded.
        let merged = dedupe_and_rank(tool, pattern);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn zero_tool_findings_pass_pattern_findings_through() {
        let pattern = vec![
            finding("b.py", 5, Category::Xss, Severity::Medium, Some(0.6)),
            finding("a.py", 9, Category::Csrf, Severity::High, None),
        ];

        let merged = dedupe_and_rank(Vec::new(), pattern);
        assert_eq!(merged.len(), 2);
        // Reordered by severity.
        assert_eq!(merged[0].file_path, "a.py");
    }

    #[test]
    fn ordering_is_severity_then_path_then_line() {
        let merged = dedupe_and_rank(
            vec![
                finding("b.py", 3, Category::Xss, Severity::High, None),
                finding("a.py", 9, Category::Xss, Severity::High, None),
                finding("a.py", 2, Category::Xss, Severity::High, None),
                finding("z.py", 1, Category::SqlInjection, Severity::Critical, None),
                finding("a.py", 1, Category::Other, Severity::Info, None),
            ],
            Vec::new(),
        );

        let keys: Vec<_> = merged
            .iter()
            .map(|f| (f.severity, f.file_path.clone(), f.start_line))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Severity::Critical, "z.py".to_string(), 1),
                (Severity::High, "a.py".to_string(), 2),
                (Severity::High, "a.py".to_string(), 9),
                (Severity::High, "b.py".to_string(), 3),
                (Severity::Info, "a.py".to_string(), 1),
            ]
        );
    }

    #[test]
    fn dedup_is_idempotent_on_its_own_output() {
        let tool = vec![
            finding("a.py", 10, Category::SqlInjection, Severity::Critical, None),
            finding("a.py", 10, Category::SecretsExposure, Severity::Critical, None),
        ];
        let pattern = vec![
            finding("a.py", 10, Category::SqlInjection, Severity::High, Some(0.8)),
            finding("a.py", 55, Category::SecretsExposure, Severity::Critical, Some(0.97)),
            finding("b.py", 7, Category::Xss, Severity::Medium, Some(0.6)),
        ];

        let once = dedupe_and_rank(tool, pattern);
        let twice = dedupe_and_rank(once.clone(), Vec::new());
        let keys = |findings: &[Finding]| {
            findings
                .iter()
                .map(|f| (f.file_path.clone(), f.start_line, f.category))
                .collect::<Vec<_>>()
        };
        assert_eq!(keys(&once), keys(&twice));
    }
}
