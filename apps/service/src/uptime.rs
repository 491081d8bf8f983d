//! Uptime ratios over trailing windows of the probe log.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::error;

use crate::database::StatusStore;

/// Uptime reported for a window that holds no records. A policy, not a
/// measurement: an unobserved window is shown as fully up.
pub const NO_DATA_UPTIME: f64 = 100.0;

/// Marker served in place of a percentage when a window could not be computed
pub const UPTIME_ERROR_MARKER: &str = "Error";

/// The trailing windows exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UptimeWindow {
    Day,
    Week,
    Month,
}

impl UptimeWindow {
    pub const ALL: [UptimeWindow; 3] = [UptimeWindow::Day, UptimeWindow::Week, UptimeWindow::Month];

    pub fn duration(self) -> Duration {
        match self {
            UptimeWindow::Day => Duration::hours(24),
            UptimeWindow::Week => Duration::days(7),
            UptimeWindow::Month => Duration::days(30),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UptimeWindow::Day => "24h",
            UptimeWindow::Week => "7d",
            UptimeWindow::Month => "30d",
        }
    }
}

/// Percentage of up records among those with `timestamp >= now - duration`
pub async fn uptime(store: &dyn StatusStore, duration: Duration, now: DateTime<Utc>) -> Result<f64> {
    let counts = store.count_since(now - duration).await?;

    if counts.total == 0 {
        return Ok(NO_DATA_UPTIME);
    }

    Ok(counts.up as f64 / counts.total as f64 * 100.0)
}

/// Uptime for every exposed window. Each window is its own query; a failure
/// only affects that window.
#[derive(Debug)]
pub struct UptimeReport {
    pub day: Result<f64>,
    pub week: Result<f64>,
    pub month: Result<f64>,
}

/// Wire form of an [`UptimeReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UptimeSummary {
    #[serde(rename = "uptime24h")]
    pub uptime_24h: String,
    #[serde(rename = "uptime7d")]
    pub uptime_7d: String,
    #[serde(rename = "uptime30d")]
    pub uptime_30d: String,
}

pub async fn uptime_report(store: &dyn StatusStore, now: DateTime<Utc>) -> UptimeReport {
    UptimeReport {
        day: window_uptime(store, UptimeWindow::Day, now).await,
        week: window_uptime(store, UptimeWindow::Week, now).await,
        month: window_uptime(store, UptimeWindow::Month, now).await,
    }
}

async fn window_uptime(store: &dyn StatusStore, window: UptimeWindow, now: DateTime<Utc>) -> Result<f64> {
    let result = uptime(store, window.duration(), now).await;
    if let Err(e) = &result {
        error!("Error calculating {} uptime: {:#}", window.label(), e);
    }
    result
}

/// Render a percentage the way the status page shows it, e.g. `99.95%`
pub fn format_percentage(value: f64) -> String {
    format!("{value:.2}%")
}

impl UptimeReport {
    pub fn summary(&self) -> UptimeSummary {
        let render = |value: &Result<f64>| match value {
            Ok(percentage) => format_percentage(*percentage),
            Err(_) => UPTIME_ERROR_MARKER.to_string(),
        };

        UptimeSummary {
            uptime_24h: render(&self.day),
            uptime_7d: render(&self.week),
            uptime_30d: render(&self.month),
        }
    }
}
