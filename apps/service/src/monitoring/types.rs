use chrono::{DateTime, Utc};

use crate::database::StatusRecord;

/// Status of a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorStatus {
    Up,
    Down,
}

/// What came back from the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A response arrived; the code is kept verbatim
    Response { status_code: u16 },
    /// Timeout, DNS failure, refused connection and the like
    TransportError { message: String },
}

impl ProbeOutcome {
    /// 2xx and 3xx count as up, everything else (including no response) as down
    pub fn status(&self) -> MonitorStatus {
        match self {
            ProbeOutcome::Response { status_code } if (200..400).contains(status_code) => {
                MonitorStatus::Up
            }
            _ => MonitorStatus::Down,
        }
    }

    /// Status code to record; 0 when no response was received
    pub fn status_code(&self) -> i64 {
        match self {
            ProbeOutcome::Response { status_code } => i64::from(*status_code),
            ProbeOutcome::TransportError { .. } => 0,
        }
    }
}

/// Result of a single probe
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// URL that was checked
    pub target: String,

    /// Timestamp when the probe completed
    pub timestamp: DateTime<Utc>,

    pub outcome: ProbeOutcome,

    /// Elapsed milliseconds from send to completion, success or failure
    pub latency_ms: i64,
}

impl CheckResult {
    pub fn status(&self) -> MonitorStatus {
        self.outcome.status()
    }

    /// Record at the precision the store keeps, so cached and stored copies agree
    pub fn to_record(&self) -> StatusRecord {
        StatusRecord::new(
            self.timestamp,
            self.status() == MonitorStatus::Up,
            self.latency_ms,
            self.outcome.status_code(),
        )
        .truncated_to_storage()
    }
}
