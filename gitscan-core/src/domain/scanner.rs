//! Scanner capability traits
//!
//! Two capability contracts a concrete scanner may implement either or both
//! of: per-file pattern scanning and whole-directory tool scanning. Scanner
//! errors never propagate into the orchestrator; it logs the failure and
//! treats the scanner as having contributed zero findings.

use std::path::Path;

use async_trait::async_trait;

use super::finding::Finding;

/// Errors a scanner can report to the orchestrator's isolation boundary.
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{tool} is not installed or not on PATH")]
    ToolUnavailable { tool: String },

    #[error("{tool} timed out after {seconds}s")]
    Timeout { tool: String, seconds: u64 },

    #[error("failed to parse {tool} output: {message}")]
    OutputParse { tool: String, message: String },

    #[error("{0}")]
    Internal(String),
}

/// Scans one file's text content.
///
/// Stateless with respect to other files: implementations only see the
/// content and the path (used for extension/language inference).
pub trait FileScanner: Send + Sync {
    /// Display name used for logging and summary reporting.
    fn name(&self) -> &str;

    /// Scan `content`, reporting findings against `file_path` (relative to
    /// the scan root).
    fn scan(&self, content: &str, file_path: &str) -> Result<Vec<Finding>, ScannerError>;
}

/// Scans a whole working copy once, typically by proxying to an external
/// analysis tool and parsing its structured output.
#[async_trait]
pub trait DirectoryScanner: Send + Sync {
    /// Display name used for logging and summary reporting.
    fn name(&self) -> &str;

    /// Whether the backing tool can run in this environment.
    async fn check_availability(&self) -> bool {
        true
    }

    /// Scan the tree rooted at `root`. Reported file paths are relative to
    /// `root`.
    async fn scan_directory(&self, root: &Path) -> Result<Vec<Finding>, ScannerError>;
}
