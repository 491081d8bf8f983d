//! Database layer: the append-only probe log.
//!
//! This module owns the `status_history` table and the queries the rest of
//! the system runs against it.

pub mod repository;
pub mod migrations;
pub mod models;

pub use models::{StatusRecord, UptimeCounts};
pub use repository::{DEFAULT_HISTORY_DAYS, StatusRepository, StatusStore};

use anyhow::Result;

/// Initialize database with schema
pub async fn initialize_database(conn: &libsql::Connection) -> Result<()> {
    migrations::run_migrations(conn).await
}
