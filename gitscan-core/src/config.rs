//! Configuration management
//!
//! Layered the same way across environments: an optional `config/default`
//! file, an optional `config/local` override, then `GITSCAN__`-prefixed
//! environment variables with `__` as the section separator
//! (e.g. `GITSCAN__SCAN__MAX_FILES_PER_SCAN=500`).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub scan: ScanConfig,
    pub tools: ToolsConfig,
    pub llm: LlmConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    /// Timeout applied to scan-submitting requests; scans run inline.
    pub request_timeout_seconds: u64,
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: vec!["*".to_string()],
            request_timeout_seconds: 600,
            shutdown_timeout_seconds: 5,
        }
    }
}

/// Limits and locations for scan execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Files larger than this are skipped during enumeration.
    pub max_file_size_mb: u64,
    /// Enumeration stops once this many files have been collected.
    pub max_files_per_scan: usize,
    /// Parent directory for disposable checkouts. Defaults to the system
    /// temp directory.
    pub checkout_parent: Option<PathBuf>,
    /// Timeout applied to git fetches.
    pub fetch_timeout_seconds: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 10,
            max_files_per_scan: 1000,
            checkout_parent: None,
            fetch_timeout_seconds: 30,
        }
    }
}

/// One external tool's executable and timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolCommand {
    pub executable: String,
    pub timeout_seconds: u64,
}

impl Default for ToolCommand {
    fn default() -> Self {
        Self {
            executable: String::new(),
            timeout_seconds: 120,
        }
    }
}

impl ToolCommand {
    fn new(executable: &str, timeout_seconds: u64) -> Self {
        Self {
            executable: executable.to_string(),
            timeout_seconds,
        }
    }
}

/// Directory-scanner tool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub semgrep: ToolCommand,
    pub bandit: ToolCommand,
    pub safety: ToolCommand,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            semgrep: ToolCommand::new("semgrep", 300),
            bandit: ToolCommand::new("bandit", 180),
            safety: ToolCommand::new("safety", 120),
        }
    }
}

/// Fix-generation provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub google_ai_api_key: Option<String>,
    pub max_tokens: u32,
    pub request_timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            google_ai_api_key: None,
            max_tokens: 2000,
            request_timeout_seconds: 120,
        }
    }
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Config {
    /// Load configuration from files and environment.
    pub fn load() -> Result<Self, ConfigLoadError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("GITSCAN").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Maximum file size in bytes derived from the configured megabyte cap.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.scan.max_file_size_mb * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_limits() {
        let config = Config::default();
        assert_eq!(config.scan.max_file_size_mb, 10);
        assert_eq!(config.scan.max_files_per_scan, 1000);
        assert_eq!(config.max_file_size_bytes(), 10 * 1024 * 1024);
        assert_eq!(config.tools.semgrep.executable, "semgrep");
        assert_eq!(config.server.port, 8000);
    }
}
