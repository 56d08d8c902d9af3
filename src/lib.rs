//! GitScan - repository security scanning service.
//!
//! This crate hosts the HTTP API over the scanning engine: scan submission
//! and lifecycle endpoints, rule-category listing, and the fix-generation
//! endpoints backed by the LLM providers.

pub mod app;
pub mod presentation;

pub use app::{create_app, AppHandle, AppState, ScanRegistry};
pub use gitscan_core::config::Config;

/// Initialize tracing from `RUST_LOG`, defaulting to info level.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
