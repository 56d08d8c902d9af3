//! Scan request and result models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::finding::{Category, Finding, Severity};

/// Which scanners a scan runs.
///
/// `Full` and `Quick` both use the complete fixed roster; `Custom` restricts
/// the roster to the scanners owning the requested categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanProfile {
    #[default]
    Full,
    Quick,
    Custom,
}

impl std::str::FromStr for ScanProfile {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FULL" => Ok(ScanProfile::Full),
            "QUICK" => Ok(ScanProfile::Quick),
            "CUSTOM" => Ok(ScanProfile::Custom),
            _ => Err(()),
        }
    }
}

/// Immutable description of one requested scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Caller-supplied identifier, unique per concurrent scan.
    pub scan_id: String,
    pub clone_url: String,
    pub branch: String,
    /// Access credential woven into the fetch URL during acquisition.
    pub access_token: Option<String>,
    pub profile: ScanProfile,
    /// Requested scanner categories; meaningful only for `Custom`.
    pub categories: Vec<Category>,
    /// Glob patterns a file's relative path must match to be scanned.
    pub include_patterns: Vec<String>,
    /// Glob patterns excluding files from the scan.
    pub exclude_patterns: Vec<String>,
}

impl ScanRequest {
    pub fn new(scan_id: impl Into<String>, clone_url: impl Into<String>) -> Self {
        Self {
            scan_id: scan_id.into(),
            clone_url: clone_url.into(),
            branch: "main".to_string(),
            access_token: None,
            profile: ScanProfile::Full,
            categories: Vec::new(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_profile(mut self, profile: ScanProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }
}

/// Lifecycle state of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanStatus {
    Running,
    Completed,
    Failed,
}

/// Per-severity finding counts, derived from a result on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
    pub total: usize,
}

/// Mutable state of one scan, exclusively owned by the orchestrator while
/// the scan runs and frozen once the status leaves [`ScanStatus::Running`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub scan_id: String,
    pub status: ScanStatus,
    pub total_files: usize,
    pub files_scanned: usize,
    pub findings: Vec<Finding>,
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ScanResult {
    /// Fresh result in `Running` state.
    pub fn running(scan_id: impl Into<String>) -> Self {
        Self {
            scan_id: scan_id.into(),
            status: ScanStatus::Running,
            total_files: 0,
            files_scanned: 0,
            findings: Vec::new(),
            error_message: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Freeze the result as successfully completed with the final findings.
    pub fn complete(&mut self, findings: Vec<Finding>) {
        self.findings = findings;
        self.status = ScanStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Freeze the result as failed with a descriptive message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = ScanStatus::Failed;
        self.error_message = Some(message.into());
        self.completed_at = Some(Utc::now());
    }

    /// Aggregate counts per severity; computed on read, never stored.
    pub fn severity_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts {
            total: self.findings.len(),
            ..Default::default()
        };
        for finding in &self.findings {
            match finding.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
                Severity::Info => counts.info += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_main_branch_and_full_profile() {
        let request = ScanRequest::new("scan-1", "https://example.com/repo.git");
        assert_eq!(request.branch, "main");
        assert_eq!(request.profile, ScanProfile::Full);
        assert!(request.categories.is_empty());
    }

    #[test]
    fn severity_counts_tally_each_level() {
        let mut result = ScanResult::running("scan-1");
        result.findings = vec![
            Finding::new("a", "", Severity::Critical, Category::Xss, "a.py", 1, 1),
            Finding::new("b", "", Severity::Critical, Category::Xss, "b.py", 1, 1),
            Finding::new("c", "", Severity::Low, Category::Other, "c.py", 1, 1),
        ];
        let counts = result.severity_counts();
        assert_eq!(counts.critical, 2);
        assert_eq!(counts.low, 1);
        assert_eq!(counts.high, 0);
        assert_eq!(counts.total, 3);
    }

    #[test]
    fn complete_and_fail_set_completion_timestamp() {
        let mut result = ScanResult::running("scan-1");
        assert!(result.completed_at.is_none());
        result.complete(vec![]);
        assert_eq!(result.status, ScanStatus::Completed);
        assert!(result.completed_at.is_some());

        let mut result = ScanResult::running("scan-2");
        result.fail("clone failed");
        assert_eq!(result.status, ScanStatus::Failed);
        assert_eq!(result.error_message.as_deref(), Some("clone failed"));
        assert!(result.completed_at.is_some());
    }
}
