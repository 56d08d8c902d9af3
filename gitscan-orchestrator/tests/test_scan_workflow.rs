//! End-to-end orchestrator tests over stub sources and scanners

mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use gitscan_core::config::ScanConfig;
use gitscan_core::{Category, ScanProfile, ScanRequest, ScanResult, ScanStatus, Severity};
use gitscan_orchestrator::{GitRepositorySource, ScanOrchestrator, ScannerRoster};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use common::{
    finding, BrokenDirectoryScanner, BrokenFileScanner, FailingSource, HangingDirectoryScanner,
    StubDirectoryScanner, StubFileScanner, StubSource,
};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

async fn run_scan(
    orchestrator: &ScanOrchestrator,
    request: &ScanRequest,
) -> ScanResult {
    let result = Arc::new(RwLock::new(ScanResult::running(&request.scan_id)));
    orchestrator
        .run(request, Arc::clone(&result), CancellationToken::new())
        .await;
    let result = result.read().await;
    result.clone()
}

#[tokio::test]
async fn completed_scan_merges_and_orders_findings() {
    let fixture = tempfile::tempdir().unwrap();
    write(fixture.path(), "a.py", "query = f\"SELECT 1\"\n");
    write(fixture.path(), "b.py", "print('ok')\n");
    write(fixture.path(), "README.md", "# not scannable\n");

    let mut roster = ScannerRoster::empty();
    roster.register_file_scanner(
        Arc::new(StubFileScanner::new("Pattern Scanner", Category::SqlInjection)),
        &[Category::SqlInjection],
    );
    roster.register_directory_scanner(
        Arc::new(StubDirectoryScanner {
            name: "Tool Scanner",
            findings: vec![finding(
                "a.py",
                10,
                Category::SqlInjection,
                Severity::Critical,
                None,
            )],
        }),
        &[Category::CodeQuality],
    );

    let orchestrator = ScanOrchestrator::new(
        Arc::new(StubSource::new(fixture.path())),
        roster,
        ScanConfig::default(),
    );

    let request = ScanRequest::new("scan-1", "https://example.com/repo.git");
    let result = run_scan(&orchestrator, &request).await;

    assert_eq!(result.status, ScanStatus::Completed);
    assert_eq!(result.total_files, 2);
    assert_eq!(result.files_scanned, 2);
    assert!(result.completed_at.is_some());
    assert!(result.error_message.is_none());

    // The pattern finding at (a.py, 10, SQL_INJECTION) is an exact duplicate
    // of the tool finding; b.py's pattern finding survives.
    assert_eq!(result.findings.len(), 2);
    assert_eq!(result.findings[0].severity, Severity::Critical);
    assert_eq!(result.findings[0].file_path, "a.py");
    assert_eq!(result.findings[1].file_path, "b.py");

    // Ordering invariant over the final list.
    for pair in result.findings.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            (a.severity, &a.file_path, a.start_line) <= (b.severity, &b.file_path, b.start_line)
        );
    }
}

#[tokio::test]
async fn acquisition_failure_fails_the_scan_with_message() {
    let orchestrator = ScanOrchestrator::new(
        Arc::new(FailingSource),
        ScannerRoster::empty(),
        ScanConfig::default(),
    );

    let request = ScanRequest::new("scan-2", "https://example.com/missing.git");
    let result = run_scan(&orchestrator, &request).await;

    assert_eq!(result.status, ScanStatus::Failed);
    assert!(result.findings.is_empty());
    assert!(result
        .error_message
        .as_deref()
        .unwrap()
        .contains("failed to acquire repository"));
    assert!(result.completed_at.is_some());
    assert_eq!(result.total_files, 0);
}

#[tokio::test]
async fn clone_failure_leaves_no_checkout_behind() {
    let parent = tempfile::tempdir().unwrap();
    let source = GitRepositorySource::new(&ScanConfig {
        checkout_parent: Some(parent.path().to_path_buf()),
        fetch_timeout_seconds: 5,
        ..Default::default()
    })
    .unwrap();

    let orchestrator = ScanOrchestrator::new(
        Arc::new(source),
        ScannerRoster::empty(),
        ScanConfig::default(),
    );

    // Port 1 on loopback refuses immediately; no DNS, no network.
    let request = ScanRequest::new("scan-3", "https://127.0.0.1:1/repo.git");
    let result = run_scan(&orchestrator, &request).await;

    assert_eq!(result.status, ScanStatus::Failed);
    assert!(result.error_message.is_some());

    let leftovers: Vec<_> = fs::read_dir(parent.path()).unwrap().collect();
    assert!(leftovers.is_empty(), "checkout directory leaked: {leftovers:?}");
}

#[tokio::test]
async fn directory_with_only_unscannable_files_completes_empty() {
    let fixture = tempfile::tempdir().unwrap();
    write(fixture.path(), "image.png", "binary");

    let mut roster = ScannerRoster::empty();
    roster.register_file_scanner(
        Arc::new(StubFileScanner::new("Pattern Scanner", Category::Xss)),
        &[Category::Xss],
    );

    let orchestrator = ScanOrchestrator::new(
        Arc::new(StubSource::new(fixture.path())),
        roster,
        ScanConfig::default(),
    );

    let request = ScanRequest::new("scan-4", "https://example.com/repo.git");
    let result = run_scan(&orchestrator, &request).await;

    assert_eq!(result.status, ScanStatus::Completed);
    assert_eq!(result.total_files, 0);
    assert_eq!(result.files_scanned, 0);
    assert!(result.findings.is_empty());
}

#[tokio::test]
async fn failing_scanners_are_isolated() {
    let fixture = tempfile::tempdir().unwrap();
    write(fixture.path(), "a.py", "x = 1\n");

    let mut roster = ScannerRoster::empty();
    roster.register_file_scanner(Arc::new(BrokenFileScanner), &[Category::Xss]);
    roster.register_file_scanner(
        Arc::new(StubFileScanner::new("Working Scanner", Category::Csrf)),
        &[Category::Csrf],
    );
    roster.register_directory_scanner(Arc::new(BrokenDirectoryScanner), &[Category::CodeQuality]);

    let orchestrator = ScanOrchestrator::new(
        Arc::new(StubSource::new(fixture.path())),
        roster,
        ScanConfig::default(),
    );

    let request = ScanRequest::new("scan-5", "https://example.com/repo.git");
    let result = run_scan(&orchestrator, &request).await;

    assert_eq!(result.status, ScanStatus::Completed);
    assert_eq!(result.files_scanned, 1);
    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].category, Category::Csrf);
}

#[tokio::test]
async fn custom_profile_runs_only_selected_scanners() {
    let fixture = tempfile::tempdir().unwrap();
    write(fixture.path(), "a.py", "x = 1\n");

    let mut roster = ScannerRoster::empty();
    roster.register_file_scanner(
        Arc::new(StubFileScanner::new("XSS Scanner", Category::Xss)),
        &[Category::Xss],
    );
    roster.register_file_scanner(
        Arc::new(StubFileScanner::new("CSRF Scanner", Category::Csrf)),
        &[Category::Csrf],
    );

    let orchestrator = ScanOrchestrator::new(
        Arc::new(StubSource::new(fixture.path())),
        roster,
        ScanConfig::default(),
    );

    let request = ScanRequest::new("scan-6", "https://example.com/repo.git")
        .with_profile(ScanProfile::Custom)
        .with_categories(vec![Category::Csrf]);
    let result = run_scan(&orchestrator, &request).await;

    assert_eq!(result.status, ScanStatus::Completed);
    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].category, Category::Csrf);
}

#[tokio::test]
async fn cancellation_reaches_cleanup_and_fails_the_result() {
    let fixture = tempfile::tempdir().unwrap();
    write(fixture.path(), "a.py", "x = 1\n");

    let mut roster = ScannerRoster::empty();
    roster.register_directory_scanner(Arc::new(HangingDirectoryScanner), &[Category::CodeQuality]);

    let orchestrator = Arc::new(ScanOrchestrator::new(
        Arc::new(StubSource::new(fixture.path())),
        roster,
        ScanConfig::default(),
    ));

    let request = ScanRequest::new("scan-7", "https://example.com/repo.git");
    let result = Arc::new(RwLock::new(ScanResult::running(&request.scan_id)));
    let cancel = CancellationToken::new();

    let task = tokio::spawn({
        let orchestrator = Arc::clone(&orchestrator);
        let request = request.clone();
        let result = Arc::clone(&result);
        let cancel = cancel.clone();
        async move { orchestrator.run(&request, result, cancel).await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    cancel.cancel();
    task.await.unwrap();

    let result = result.read().await;
    assert_eq!(result.status, ScanStatus::Failed);
    assert_eq!(result.error_message.as_deref(), Some("scan cancelled"));
    assert!(result.completed_at.is_some());
}
