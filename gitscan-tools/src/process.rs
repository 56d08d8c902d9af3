//! Shared subprocess plumbing for tool adapters

use std::ffi::OsStr;
use std::process::Output;
use std::time::Duration;

use gitscan_core::ScannerError;
use tokio::process::Command;
use tracing::debug;

/// Run `executable --version` to check the tool is installed.
pub async fn check_version(executable: &str) -> bool {
    match Command::new(executable).arg("--version").output().await {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
            debug!(tool = executable, version = %version, "Tool available");
            true
        }
        _ => false,
    }
}

/// Run a tool with the given arguments, bounded by `timeout`.
///
/// Non-zero exit codes are not treated as failure here: several tools exit
/// non-zero when they find issues, so callers decide based on stdout.
pub async fn run_tool<I, S>(
    tool: &str,
    executable: &str,
    args: I,
    timeout: Duration,
) -> Result<Output, ScannerError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(executable);
    command.args(args);

    let output = tokio::time::timeout(timeout, command.output())
        .await
        .map_err(|_| ScannerError::Timeout {
            tool: tool.to_string(),
            seconds: timeout.as_secs(),
        })?
        .map_err(|_| ScannerError::ToolUnavailable {
            tool: tool.to_string(),
        })?;

    Ok(output)
}

/// Strip the scan root prefix from an absolute tool-reported path.
pub fn relative_path(reported: &str, root: &std::path::Path) -> String {
    let root_str = root.to_string_lossy();
    reported
        .strip_prefix(root_str.as_ref())
        .map(|p| p.trim_start_matches(['/', '\\']).to_string())
        .unwrap_or_else(|| reported.to_string())
}
