//! Scan orchestration for GitScan.
//!
//! Given a [`gitscan_core::ScanRequest`], the orchestrator acquires a
//! disposable working copy of the target repository, selects the applicable
//! scanners, drives directory- and file-level scanning, and merges the two
//! finding sets through the deduplication and ranking engine into one
//! severity-ordered report.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::dedup::dedupe_and_rank;
pub use application::orchestrator::ScanOrchestrator;
pub use application::roster::{ScannerRoster, ScannerSelection};
pub use domain::source::{GitSourceError, RepositorySource, Workspace};
pub use infrastructure::git::GitRepositorySource;
pub use infrastructure::walker::FileWalker;
