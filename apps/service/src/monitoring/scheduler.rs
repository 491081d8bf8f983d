use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use super::executor::ProbeExecutor;

/// Probe scheduler - fires one probe immediately, then one per interval
pub struct ProbeScheduler {
    executor: Arc<ProbeExecutor>,
    interval: Duration,
    in_flight: Arc<AtomicBool>,
}

/// Clears the in-flight flag when the probe task ends, even on panic
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ProbeScheduler {
    /// Create a new probe scheduler
    pub fn new(executor: Arc<ProbeExecutor>, interval: Duration) -> Self {
        Self { executor, interval, in_flight: Arc::new(AtomicBool::new(false)) }
    }

    /// Spawn the polling loop. It runs until the runtime shuts down.
    ///
    /// Each probe runs in its own task so the ticker keeps its cadence. A tick
    /// that arrives while the previous probe is still running is skipped.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tracing::info!(
            "Starting status checker for {} every {:?}",
            self.executor.target(),
            self.interval
        );

        tokio::spawn(async move {
            let mut timer = interval(self.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                // The first tick completes immediately.
                timer.tick().await;

                if self.in_flight.swap(true, Ordering::AcqRel) {
                    tracing::warn!(
                        "Previous probe of {} still in flight, skipping this tick",
                        self.executor.target()
                    );
                    continue;
                }

                let guard = InFlightGuard(self.in_flight.clone());
                let executor = self.executor.clone();
                tokio::spawn(async move {
                    let _guard = guard;
                    executor.run_probe().await;
                });
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{StatusRecord, StatusStore, UptimeCounts};
    use crate::monitoring::cache::LatestStatus;
    use crate::monitoring::checker::Checker;
    use crate::monitoring::types::{CheckResult, ProbeOutcome};
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::atomic::AtomicUsize;

    struct SlowChecker {
        delay: Duration,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Checker for SlowChecker {
        async fn check(&self, target: &str) -> CheckResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            CheckResult {
                target: target.to_string(),
                timestamp: Utc::now(),
                outcome: ProbeOutcome::Response { status_code: 200 },
                latency_ms: self.delay.as_millis() as i64,
            }
        }
    }

    struct NullStore;

    #[async_trait]
    impl StatusStore for NullStore {
        async fn append(&self, _record: &StatusRecord) -> Result<i64> {
            Ok(1)
        }

        async fn history_since(&self, _cutoff: DateTime<Utc>) -> Result<Vec<StatusRecord>> {
            Ok(Vec::new())
        }

        async fn latest(&self) -> Result<Option<StatusRecord>> {
            Ok(None)
        }

        async fn count_since(&self, _cutoff: DateTime<Utc>) -> Result<UptimeCounts> {
            Ok(UptimeCounts::default())
        }
    }

    fn build(delay: Duration, every: Duration) -> (ProbeScheduler, Arc<SlowChecker>, Arc<LatestStatus>) {
        let checker = Arc::new(SlowChecker { delay, calls: AtomicUsize::new(0) });
        let latest = Arc::new(LatestStatus::new());
        let executor = Arc::new(ProbeExecutor::with_checker(
            "https://example.com".into(),
            checker.clone(),
            Arc::new(NullStore),
            latest.clone(),
        ));
        (ProbeScheduler::new(executor, every), checker, latest)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_probe_fires_immediately() {
        let (scheduler, checker, latest) = build(Duration::from_millis(1), Duration::from_secs(60));
        let mut rx = latest.subscribe();

        let handle = scheduler.start();
        tokio::time::timeout(Duration::from_secs(1), rx.changed()).await.unwrap().unwrap();

        assert_eq!(checker.calls.load(Ordering::SeqCst), 1);
        assert!(latest.load().unwrap().is_up);
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_during_a_slow_probe_are_skipped() {
        let (scheduler, checker, _latest) =
            build(Duration::from_millis(250), Duration::from_millis(100));

        let handle = scheduler.start();
        // Ticks at 0, 100, 200, 300: the probe from 0 holds until 250.
        tokio::time::sleep(Duration::from_millis(350)).await;

        assert_eq!(checker.calls.load(Ordering::SeqCst), 2);
        handle.abort();
    }
}
