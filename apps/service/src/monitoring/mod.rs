pub mod cache;
pub mod checker;
/// Monitoring engine module - drives the reachability probe
///
/// This module is responsible for:
/// - Executing the HTTP GET probe and classifying its outcome
/// - Scheduling probes at a fixed interval
/// - Keeping the latest outcome in memory and handing records to the store
pub mod executor;
pub mod scheduler;
pub mod types;

pub use cache::LatestStatus;
pub use checker::{Checker, HttpChecker};
pub use executor::ProbeExecutor;
pub use scheduler::ProbeScheduler;
pub use types::{CheckResult, MonitorStatus, ProbeOutcome};
