//! Server setup and lifecycle management

use crate::api::{create_router, AppState};
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use crate::scheduler::ExpirationScanner;
use crate::storage::{InMemoryStorage, Storage};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Governance daemon server
pub struct Server {
    config: DaemonConfig,
    storage: Arc<dyn Storage>,
    scanner: Arc<ExpirationScanner>,
}

impl Server {
    /// Create a new server backed by in-memory storage
    pub fn new(config: DaemonConfig) -> Self {
        Self::with_storage(config, Arc::new(InMemoryStorage::new()))
    }

    /// Create a new server over an existing storage backend
    pub fn with_storage(config: DaemonConfig, storage: Arc<dyn Storage>) -> Self {
        let scanner = ExpirationScanner::new(config.exceptions.clone(), storage.clone());
        Self {
            config,
            storage,
            scanner,
        }
    }

    /// Build the HTTP router without binding a socket
    pub fn router(&self) -> axum::Router {
        create_router(AppState::new(self.storage.clone(), self.config.clone()))
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;
        let app = self.router();

        // Create listener
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("aigov daemon listening on {}", addr);

        // Start expiration scanner in background
        let scanner = self.scanner.clone();
        tokio::spawn(async move {
            scanner.start().await;
        });

        // Run server with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("aigov daemon shutting down");

        self.scanner.stop().await;

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
