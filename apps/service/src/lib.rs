//! Core of the statusboard service: probing a single URL, recording each
//! outcome in an append-only SQLite log and computing uptime from it.

pub mod config;
pub mod database;
pub mod monitoring;
pub mod pool;
pub mod uptime;
pub mod validation;

pub use config::Config;
pub use database::{StatusRecord, StatusRepository, StatusStore};
pub use monitoring::{LatestStatus, ProbeExecutor, ProbeScheduler};

use std::path::Path;
use std::sync::Arc;

/// Open the store at `path`, bring the schema up to date and hand back the
/// repository. Any failure here is a startup failure.
pub async fn open_store(path: impl AsRef<Path>) -> anyhow::Result<Arc<StatusRepository>> {
    let pool = pool::open_pool(path).await?;
    {
        let conn = pool.get().await?;
        database::initialize_database(&conn).await?;
    }
    tracing::info!("Database initialized successfully.");
    Ok(Arc::new(StatusRepository::new_from_pool(pool)))
}
