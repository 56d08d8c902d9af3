//! Tool-backed directory scanners for GitScan.
//!
//! Each adapter shells out to an external analysis tool with a bounded
//! timeout, parses its JSON output into canonical findings, and maps the
//! tool's severity/category taxonomy onto ours. Tool findings are treated
//! as higher fidelity than pattern findings by the deduplication engine.

pub mod bandit;
pub mod dependency;
pub mod process;
pub mod semgrep;

pub use bandit::BanditScanner;
pub use dependency::DependencyScanner;
pub use semgrep::SemgrepScanner;
