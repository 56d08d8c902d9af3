//! GitScan - main application entry point
//!
//! Starts the HTTP API server with graceful shutdown.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::{net::TcpListener, signal};
use tokio_util::sync::CancellationToken;

use gitscan::{create_app, init_tracing, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: failed to load .env file: {}", e);
        }
    }

    let config = Config::load()?;
    init_tracing();

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        "Starting GitScan server"
    );

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);

    let app = create_app(config)?;

    tracing::info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.router)
        .with_graceful_shutdown(shutdown_signal(app.shutdown_token, shutdown_timeout))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM, then cancel in-flight background work.
async fn shutdown_signal(shutdown_token: CancellationToken, timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }

    shutdown_token.cancel();
    tokio::time::sleep(timeout).await;
}
