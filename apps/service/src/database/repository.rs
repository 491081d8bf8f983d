use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use libsql::{Row, params};
use tracing::warn;

use super::models::{StatusRecord, UptimeCounts, decode_timestamp, encode_legacy_cutoff, encode_timestamp};
use crate::pool::LibsqlPool;

/// Default window served by `recent_history`
pub const DEFAULT_HISTORY_DAYS: u32 = 90;

const SELECT_COLUMNS: &str = "SELECT timestamp, is_up, response_time_ms, status_code FROM status_history";

/// Rows at or after a cutoff. `?1` is the canonical cutoff; legacy naive rows
/// sort differently and are compared against `?2`, the cutoff in their layout.
const SINCE_CUTOFF: &str =
    "(timestamp >= ?1 OR (timestamp LIKE '____-__-__ __:__:__' AND timestamp >= ?2))";

/// Append-only log of probe outcomes
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Insert one record, returning its row id
    async fn append(&self, record: &StatusRecord) -> Result<i64>;

    /// Records with `timestamp >= cutoff`, oldest first
    async fn history_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<StatusRecord>>;

    /// The most recent record, or `None` when the log is empty
    async fn latest(&self) -> Result<Option<StatusRecord>>;

    /// Total and up counts for records with `timestamp >= cutoff`
    async fn count_since(&self, cutoff: DateTime<Utc>) -> Result<UptimeCounts>;

    /// Records from the trailing `window_days`, oldest first
    async fn recent_history(&self, window_days: u32) -> Result<Vec<StatusRecord>> {
        self.history_since(Utc::now() - Duration::days(i64::from(window_days))).await
    }
}

/// LibSQL-backed status log
pub struct StatusRepository {
    pool: LibsqlPool,
}

impl StatusRepository {
    /// Create a new repository from a pool
    pub fn new_from_pool(pool: LibsqlPool) -> Self {
        Self { pool }
    }

    /// Get a connection from the pool
    async fn get_conn(&self) -> Result<deadpool::managed::Object<crate::pool::LibsqlManager>> {
        Ok(self.pool.get().await?)
    }
}

/// Map a row to a record. Rows with an unreadable timestamp yield `None`.
fn record_from_row(row: &Row) -> Result<Option<StatusRecord>> {
    let raw_timestamp: String = row.get(0)?;
    let Some(timestamp) = decode_timestamp(&raw_timestamp) else {
        warn!("Skipping status row with unparseable timestamp '{}'", raw_timestamp);
        return Ok(None);
    };

    Ok(Some(StatusRecord {
        timestamp,
        is_up: row.get::<i64>(1)? != 0,
        response_time_ms: row.get(2)?,
        status_code: row.get(3)?,
    }))
}

#[async_trait]
impl StatusStore for StatusRepository {
    async fn append(&self, record: &StatusRecord) -> Result<i64> {
        let conn = self.get_conn().await?;

        conn.execute(
            "INSERT INTO status_history (timestamp, is_up, response_time_ms, status_code) VALUES (?, ?, ?, ?)",
            params![
                encode_timestamp(record.timestamp),
                if record.is_up { 1 } else { 0 },
                record.response_time_ms,
                record.status_code
            ],
        )
        .await?;

        Ok(conn.last_insert_rowid())
    }

    async fn history_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<StatusRecord>> {
        let conn = self.get_conn().await?;
        let stmt = conn
            .prepare(&format!("{SELECT_COLUMNS} WHERE {SINCE_CUTOFF} ORDER BY id ASC"))
            .await?;

        let mut rows = stmt
            .query(params![encode_timestamp(cutoff), encode_legacy_cutoff(cutoff)])
            .await?;
        let mut records = Vec::new();

        while let Some(row) = rows.next().await? {
            match record_from_row(&row) {
                Ok(Some(record)) if record.timestamp >= cutoff => records.push(record),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable status row: {}", e),
            }
        }

        // Legacy and canonical layouts do not sort together as strings.
        // Stable, so equal instants stay in insert order.
        records.sort_by_key(|record| record.timestamp);
        Ok(records)
    }

    async fn latest(&self) -> Result<Option<StatusRecord>> {
        let conn = self.get_conn().await?;
        let stmt = conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY timestamp DESC, id DESC"))
            .await?;

        let mut rows = stmt.query(()).await?;

        // Normally the first row; unreadable rows are stepped over.
        while let Some(row) = rows.next().await? {
            if let Some(record) = record_from_row(&row)? {
                return Ok(Some(record));
            }
        }

        Ok(None)
    }

    async fn count_since(&self, cutoff: DateTime<Utc>) -> Result<UptimeCounts> {
        let conn = self.get_conn().await?;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT COUNT(*), COALESCE(SUM(CASE WHEN is_up = 1 THEN 1 ELSE 0 END), 0)
                     FROM status_history
                     WHERE {SINCE_CUTOFF}"
                ),
                params![encode_timestamp(cutoff), encode_legacy_cutoff(cutoff)],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(UptimeCounts {
                total: row.get::<i64>(0)?.max(0) as u64,
                up: row.get::<i64>(1)?.max(0) as u64,
            }),
            None => Ok(UptimeCounts::default()),
        }
    }
}
