//! Shared tracing setup for the statusboard binaries.

mod subscriber;

pub use subscriber::{LogFormat, init as init_tracing};
