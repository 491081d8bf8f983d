use std::env::var;

use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the log layer, selected through `RUST_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

pub fn init() {
    initialize_tracing(LevelFilter::INFO);
}

/// Initialize tracing subscriber with default configuration.
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
fn initialize_tracing(level: LevelFilter) {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let log_format = var("RUST_LOG_FORMAT")
        .map(|value| LogFormat::from_env_value(&value))
        .unwrap_or(LogFormat::Compact);

    let log_layer = match log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().with_filter(env_filter).boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_filter(env_filter)
            .boxed(),
    };

    if let Err(error) = tracing_subscriber::registry().with(log_layer).try_init() {
        warn!("Tracing subscriber already initialised: {error}");
    }
}
