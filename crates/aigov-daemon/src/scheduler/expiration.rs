//! Periodic risk exception expiration scan

use crate::config::ExceptionConfig;
use crate::storage::{ExceptionStorage, Storage, StorageResult};
use aigov_rules::{check_expirations, ExpirationReport};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{interval, Duration};

/// Background scanner that reports expired and expiring-soon exceptions
pub struct ExpirationScanner {
    config: ExceptionConfig,
    storage: Arc<dyn Storage>,
    running: Arc<RwLock<bool>>,
}

impl ExpirationScanner {
    pub fn new(config: ExceptionConfig, storage: Arc<dyn Storage>) -> Arc<Self> {
        Arc::new(Self {
            config,
            storage,
            running: Arc::new(RwLock::new(false)),
        })
    }

    /// Run one scan over every stored exception
    pub async fn scan(&self, now: chrono::DateTime<chrono::Utc>) -> StorageResult<ExpirationReport> {
        let exceptions = self.storage.list_all_exceptions().await?;
        let report = check_expirations(&exceptions, now, self.config.lookahead());

        for exception in &report.expired {
            tracing::warn!(
                exception_id = %exception.id,
                project_id = %exception.project_id,
                organization_id = %exception.organization_id,
                "Risk exception expired"
            );
        }
        for exception in &report.expiring_soon {
            tracing::info!(
                exception_id = %exception.id,
                project_id = %exception.project_id,
                expires_at = ?exception.expires_at,
                "Risk exception expiring soon"
            );
        }
        tracing::debug!(
            scanned = exceptions.len(),
            expired = report.expired.len(),
            expiring_soon = report.expiring_soon.len(),
            "Expiration scan complete"
        );

        Ok(report)
    }

    /// Start the scan loop; returns once [`stop`](Self::stop) is called
    pub async fn start(self: Arc<Self>) {
        {
            let mut running = self.running.write().await;
            *running = true;
        }

        tracing::info!(
            interval_secs = self.config.scan_interval_secs,
            "Expiration scanner started"
        );

        let mut interval = interval(Duration::from_secs(self.config.scan_interval_secs.max(1)));
        loop {
            interval.tick().await;

            let running = self.running.read().await;
            if !*running {
                break;
            }
            drop(running);

            if let Err(e) = self.scan(chrono::Utc::now()).await {
                tracing::error!(error = %e, "Expiration scan failed");
            }
        }

        tracing::info!("Expiration scanner stopped");
    }

    /// Stop the scan loop
    pub async fn stop(&self) {
        let mut running = self.running.write().await;
        *running = false;
    }
}
