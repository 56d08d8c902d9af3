//! Application state and wiring

use std::collections::HashMap;
use std::sync::Arc;

use gitscan_core::{Config, ScanResult, ScanStatus};
use gitscan_llm::ProviderRegistry;
use gitscan_orchestrator::{GitRepositorySource, ScanOrchestrator, ScannerRoster};
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::presentation::routes::create_router;

/// Live handle to one scan: the shared result plus its cancellation token.
/// The orchestrator is the sole writer of the result.
#[derive(Clone)]
pub struct ScanHandle {
    pub result: Arc<RwLock<ScanResult>>,
    pub cancel: CancellationToken,
}

/// In-memory registry of scans, past and running. Results are kept for the
/// process lifetime; there is no persistence layer.
#[derive(Default)]
pub struct ScanRegistry {
    inner: Mutex<HashMap<String, ScanHandle>>,
}

impl ScanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new scan. Rejects an id that is still running; a finished
    /// scan with the same id is replaced.
    pub async fn register(&self, scan_id: &str) -> Result<ScanHandle, ScanInProgress> {
        let mut inner = self.inner.lock().await;

        if let Some(existing) = inner.get(scan_id) {
            if existing.result.read().await.status == ScanStatus::Running {
                return Err(ScanInProgress(scan_id.to_string()));
            }
        }

        let handle = ScanHandle {
            result: Arc::new(RwLock::new(ScanResult::running(scan_id))),
            cancel: CancellationToken::new(),
        };
        inner.insert(scan_id.to_string(), handle.clone());
        Ok(handle)
    }

    pub async fn get(&self, scan_id: &str) -> Option<ScanHandle> {
        self.inner.lock().await.get(scan_id).cloned()
    }

    /// Cancel a scan by id. Returns false when the id is unknown.
    pub async fn cancel(&self, scan_id: &str) -> bool {
        match self.inner.lock().await.get(scan_id) {
            Some(handle) => {
                info!(scan_id, "Cancelling scan");
                handle.cancel.cancel();
                true
            }
            None => false,
        }
    }
}

/// Error for a scan id that is already in use by a running scan.
#[derive(Debug, thiserror::Error)]
#[error("scan {0} is already running")]
pub struct ScanInProgress(pub String);

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Arc<ScanOrchestrator>,
    pub scans: Arc<ScanRegistry>,
    pub llm: Arc<ProviderRegistry>,
}

/// The assembled application.
pub struct AppHandle {
    pub router: axum::Router,
    pub shutdown_token: CancellationToken,
}

/// Build the application router and its shutdown token.
pub fn create_app(config: Config) -> anyhow::Result<AppHandle> {
    let config = Arc::new(config);

    let source = GitRepositorySource::new(&config.scan)?;
    let roster = ScannerRoster::standard(&config.tools);
    let orchestrator = Arc::new(ScanOrchestrator::new(
        Arc::new(source),
        roster,
        config.scan.clone(),
    ));

    let state = AppState {
        config: Arc::clone(&config),
        orchestrator,
        scans: Arc::new(ScanRegistry::new()),
        llm: Arc::new(ProviderRegistry::new(config.llm.clone())),
    };

    let router = create_router(state, &config);

    Ok(AppHandle {
        router,
        shutdown_token: CancellationToken::new(),
    })
}
