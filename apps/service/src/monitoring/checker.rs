use anyhow::Result;
use chrono::Utc;
use std::time::{Duration, Instant};

use super::types::{CheckResult, ProbeOutcome};

/// Checker trait for reachability probes
#[async_trait::async_trait]
pub trait Checker: Send + Sync {
    /// Probe the target. Failures are part of the result, never an error.
    async fn check(&self, target: &str) -> CheckResult;
}

/// HTTP/HTTPS checker: a plain GET with a request timeout
pub struct HttpChecker {
    client: reqwest::Client,
}

impl HttpChecker {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Checker for HttpChecker {
    async fn check(&self, target: &str) -> CheckResult {
        let start = Instant::now();

        let response = self.client.get(target).send().await;

        let latency_ms = i64::try_from(start.elapsed().as_millis()).unwrap_or(i64::MAX);

        let outcome = match response {
            Ok(resp) => ProbeOutcome::Response { status_code: resp.status().as_u16() },
            Err(e) => ProbeOutcome::TransportError { message: describe_transport_error(&e) },
        };

        CheckResult { target: target.to_string(), timestamp: Utc::now(), outcome, latency_ms }
    }
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        format!("HTTP request failed: {error}")
    }
}
