//! Scan orchestrator
//!
//! Drives the acquire-and-scan protocol for one request: acquire a working
//! copy, enumerate candidate files, run directory scanners once over the
//! tree and file scanners once per file, then dedupe and rank. The
//! orchestrator is the sole writer of the shared result handle; readers may
//! poll it for progress while the scan runs.

use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use gitscan_core::config::ScanConfig;
use gitscan_core::{DirectoryScanner, Finding, ScanRequest, ScanResult};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::application::dedup::dedupe_and_rank;
use crate::application::roster::ScannerRoster;
use crate::domain::source::{GitSourceError, RepositorySource};
use crate::infrastructure::walker::FileWalker;

#[derive(Debug, thiserror::Error)]
enum ScanFailure {
    #[error("failed to acquire repository: {0}")]
    Acquisition(#[from] GitSourceError),

    #[error("scan cancelled")]
    Cancelled,
}

/// Executes scans against a repository source with a fixed scanner roster.
pub struct ScanOrchestrator {
    source: Arc<dyn RepositorySource>,
    roster: ScannerRoster,
    scan_config: ScanConfig,
}

impl ScanOrchestrator {
    pub fn new(
        source: Arc<dyn RepositorySource>,
        roster: ScannerRoster,
        scan_config: ScanConfig,
    ) -> Self {
        Self {
            source,
            roster,
            scan_config,
        }
    }

    pub fn roster(&self) -> &ScannerRoster {
        &self.roster
    }

    /// Run one scan to completion, mutating `result` in place.
    ///
    /// Never returns an error: any failure is captured on the result record
    /// with its completion timestamp set. The working copy is released on
    /// every path.
    pub async fn run(
        &self,
        request: &ScanRequest,
        result: Arc<RwLock<ScanResult>>,
        cancel: CancellationToken,
    ) {
        info!(scan_id = %request.scan_id, repository = %request.clone_url, "Starting security scan");

        if let Err(failure) = self.run_inner(request, &result, &cancel).await {
            error!(scan_id = %request.scan_id, error = %failure, "Scan failed");
            result.write().await.fail(failure.to_string());
        }
    }

    async fn run_inner(
        &self,
        request: &ScanRequest,
        result: &RwLock<ScanResult>,
        cancel: &CancellationToken,
    ) -> Result<(), ScanFailure> {
        // Fatal on failure; the workspace deletes its checkout on drop, so
        // cleanup runs on every exit path below, early returns included.
        let workspace = self
            .source
            .acquire(
                &request.scan_id,
                &request.clone_url,
                &request.branch,
                request.access_token.as_deref(),
            )
            .await?;

        let walker = FileWalker::new(
            self.scan_config.max_file_size_mb * 1024 * 1024,
            self.scan_config.max_files_per_scan,
        )
        .with_patterns(&request.include_patterns, &request.exclude_patterns);
        let files = walker.enumerate(workspace.root());

        result.write().await.total_files = files.len();
        info!(scan_id = %request.scan_id, total_files = files.len(), "Enumerated candidate files");

        let selection = self.roster.select(request.profile, &request.categories);

        // Professional tools run first over the whole tree; their findings
        // win against overlapping pattern findings during dedup.
        let tool_findings = tokio::select! {
            findings = run_directory_scanners(&selection.directory_scanners, workspace.root()) => findings,
            _ = cancel.cancelled() => return Err(ScanFailure::Cancelled),
        };

        let mut pattern_findings: Vec<Finding> = Vec::new();
        for file in &files {
            if cancel.is_cancelled() {
                return Err(ScanFailure::Cancelled);
            }

            match tokio::fs::read(&file.absolute).await {
                Ok(bytes) => {
                    // Best-effort decoding; undecodable bytes never fail a file.
                    let content = String::from_utf8_lossy(&bytes);
                    for scanner in &selection.file_scanners {
                        match scanner.scan(&content, &file.relative) {
                            Ok(found) => pattern_findings.extend(found),
                            Err(e) => warn!(
                                scanner = scanner.name(),
                                file = %file.relative,
                                error = %e,
                                "Scanner error"
                            ),
                        }
                    }
                    result.write().await.files_scanned += 1;
                }
                Err(e) => warn!(file = %file.relative, error = %e, "Failed to read file"),
            }
        }

        let tool_count = tool_findings.len();
        let pattern_count = pattern_findings.len();
        let findings = dedupe_and_rank(tool_findings, pattern_findings);

        info!(
            scan_id = %request.scan_id,
            professional_findings = tool_count,
            regex_findings = pattern_count,
            final_findings = findings.len(),
            "Scan completed"
        );

        result.write().await.complete(findings);
        Ok(())
    }
}

/// Run every directory scanner concurrently; a single scanner's failure
/// contributes zero findings and never stops the others.
async fn run_directory_scanners(
    scanners: &[Arc<dyn DirectoryScanner>],
    root: &Path,
) -> Vec<Finding> {
    let futures = scanners.iter().map(|scanner| {
        let scanner = Arc::clone(scanner);
        let root = root.to_path_buf();
        async move {
            match scanner.scan_directory(&root).await {
                Ok(findings) => {
                    info!(
                        scanner = scanner.name(),
                        findings = findings.len(),
                        "Directory scanner completed"
                    );
                    findings
                }
                Err(e) => {
                    warn!(scanner = scanner.name(), error = %e, "Directory scanner error");
                    Vec::new()
                }
            }
        }
    });

    join_all(futures).await.into_iter().flatten().collect()
}
