//! Shared fixtures for orchestrator integration tests

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use gitscan_core::{
    Category, DirectoryScanner, Finding, FileScanner, ScannerError, Severity,
};
use gitscan_orchestrator::{GitSourceError, RepositorySource, Workspace};

/// Finding factory with the fields the dedup engine cares about.
pub fn finding(
    file: &str,
    line: u32,
    category: Category,
    severity: Severity,
    confidence: Option<f64>,
) -> Finding {
    let mut f = Finding::new(
        format!("{} at {}:{}", category, file, line),
        "fixture finding",
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

/// Repository source handing out a prepared local directory.
pub struct StubSource {
    root: PathBuf,
}

impl StubSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl RepositorySource for StubSource {
    async fn acquire(
        &self,
        _scan_id: &str,
        _clone_url: &str,
        _branch: &str,
        _access_token: Option<&str>,
    ) -> Result<Workspace, GitSourceError> {
        Ok(Workspace::borrowed(self.root.clone()))
    }
}

/// Repository source that always fails to acquire.
pub struct FailingSource;

#[async_trait]
impl RepositorySource for FailingSource {
    async fn acquire(
        &self,
        _scan_id: &str,
        _clone_url: &str,
        _branch: &str,
        _access_token: Option<&str>,
    ) -> Result<Workspace, GitSourceError> {
        Err(GitSourceError::Io(std::io::Error::other(
            "repository not found",
        )))
    }
}

/// File scanner emitting one fixed-category finding per scanned file.
pub struct StubFileScanner {
    pub name: &'static str,
    pub category: Category,
    pub severity: Severity,
    pub confidence: Option<f64>,
    pub line: u32,
}

impl StubFileScanner {
    pub fn new(name: &'static str, category: Category) -> Self {
        Self {
            name,
            category,
            severity: Severity::High,
            confidence: Some(0.8),
            line: 10,
        }
    }
}

impl FileScanner for StubFileScanner {
    fn name(&self) -> &str {
        self.name
    }

    fn scan(&self, _content: &str, file_path: &str) -> Result<Vec<Finding>, ScannerError> {
        Ok(vec![finding(
            file_path,
            self.line,
            self.category,
            self.severity,
            self.confidence,
        )])
    }
}

/// File scanner that always errors; the orchestrator must isolate it.
pub struct BrokenFileScanner;

impl FileScanner for BrokenFileScanner {
    fn name(&self) -> &str {
        "Broken Scanner"
    }

    fn scan(&self, _content: &str, _file_path: &str) -> Result<Vec<Finding>, ScannerError> {
        Err(ScannerError::Internal("synthetic failure".to_string()))
    }
}

/// Directory scanner returning a fixed finding set.
pub struct StubDirectoryScanner {
    pub name: &'static str,
    pub findings: Vec<Finding>,
}

#[async_trait]
impl DirectoryScanner for StubDirectoryScanner {
    fn name(&self) -> &str {
        self.name
    }

    async fn scan_directory(&self, _root: &Path) -> Result<Vec<Finding>, ScannerError> {
        Ok(self.findings.clone())
    }
}

/// Directory scanner that never finishes; used to exercise cancellation.
pub struct HangingDirectoryScanner;

#[async_trait]
impl DirectoryScanner for HangingDirectoryScanner {
    fn name(&self) -> &str {
        "Hanging Scanner"
    }

    async fn scan_directory(&self, _root: &Path) -> Result<Vec<Finding>, ScannerError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }
}

/// Directory scanner that always errors.
pub struct BrokenDirectoryScanner;

#[async_trait]
impl DirectoryScanner for BrokenDirectoryScanner {
    fn name(&self) -> &str {
        "Broken Directory Scanner"
    }

    async fn scan_directory(&self, _root: &Path) -> Result<Vec<Finding>, ScannerError> {
        Err(ScannerError::Timeout {
            tool: "stub".to_string(),
            seconds: 1,
        })
    }
}
