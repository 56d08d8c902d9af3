//! Repository source capability contract

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempDir;

/// Errors emitted while acquiring a working copy.
#[derive(Debug, thiserror::Error)]
pub enum GitSourceError {
    #[error("unsupported URL scheme for {0}; only https:// is supported")]
    UnsupportedScheme(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("git clone failed: {0}")]
    Clone(#[from] git2::Error),

    #[error("blocking clone task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A disposable local checkout, deleted when dropped.
///
/// Holding the backing [`TempDir`] inside the workspace makes release
/// unconditional: the checkout disappears on every exit path, including
/// panics and cancellation.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    _tempdir: Option<TempDir>,
}

impl Workspace {
    /// Workspace owning a temporary checkout directory.
    pub fn owned(tempdir: TempDir) -> Self {
        Self {
            root: tempdir.path().to_path_buf(),
            _tempdir: Some(tempdir),
        }
    }

    /// Workspace over an existing directory that outlives the scan. Used by
    /// tests exercising the orchestrator against prepared fixtures.
    pub fn borrowed(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            _tempdir: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Produces a local working copy of a remote repository.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Acquire a shallow, single-branch checkout of `clone_url` at `branch`.
    /// The credential, when present, must be woven into the fetch URL.
    async fn acquire(
        &self,
        scan_id: &str,
        clone_url: &str,
        branch: &str,
        access_token: Option<&str>,
    ) -> Result<Workspace, GitSourceError>;
}
