use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::cache::LatestStatus;
use super::checker::{Checker, HttpChecker};
use super::types::{MonitorStatus, ProbeOutcome};
use crate::database::{StatusRecord, StatusStore};

/// Probe executor - runs one probe and records its outcome
pub struct ProbeExecutor {
    checker: Arc<dyn Checker>,
    store: Arc<dyn StatusStore>,
    latest: Arc<LatestStatus>,
    target: String,
}

impl ProbeExecutor {
    /// Create an executor that probes `target` over HTTP
    pub fn new(
        target: String,
        timeout: Duration,
        store: Arc<dyn StatusStore>,
        latest: Arc<LatestStatus>,
    ) -> Result<Self> {
        Ok(Self::with_checker(target, Arc::new(HttpChecker::new(timeout)?), store, latest))
    }

    pub fn with_checker(
        target: String,
        checker: Arc<dyn Checker>,
        store: Arc<dyn StatusStore>,
        latest: Arc<LatestStatus>,
    ) -> Self {
        Self { checker, store, latest, target }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Execute one probe.
    ///
    /// The latest cache is updated first and unconditionally; a failed append
    /// is logged and the record is dropped.
    pub async fn run_probe(&self) -> StatusRecord {
        let result = self.checker.check(&self.target).await;

        match (&result.outcome, result.status()) {
            (ProbeOutcome::TransportError { message }, _) => {
                warn!("Check failed for {}: {}", self.target, message);
            }
            (ProbeOutcome::Response { status_code }, MonitorStatus::Up) => {
                info!(
                    "Check successful for {}: Status {}, Response Time {}ms",
                    self.target, status_code, result.latency_ms
                );
            }
            (ProbeOutcome::Response { status_code }, MonitorStatus::Down) => {
                warn!("Check failed for {}: Status {}", self.target, status_code);
            }
        }

        let record = result.to_record();
        self.latest.store(record.clone());

        if let Err(e) = self.store.append(&record).await {
            error!("Failed to save status record: {:#}", e);
        }

        record
    }
}
