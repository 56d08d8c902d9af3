//! Core domain model for GitScan.
//!
//! This crate holds the types shared by every other crate in the workspace:
//! the canonical [`Finding`] record, scan request/result models, the two
//! scanner capability traits, and service configuration.

pub mod config;
pub mod domain;

pub use config::{Config, ConfigLoadError};
pub use domain::finding::{Category, Finding, Severity};
pub use domain::scan::{ScanProfile, ScanRequest, ScanResult, ScanStatus, SeverityCounts};
pub use domain::scanner::{DirectoryScanner, FileScanner, ScannerError};
