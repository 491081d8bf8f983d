//! Shared helpers for the service integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use statusboard_service::{StatusRecord, StatusRepository, StatusStore, open_store};
use tempfile::{TempDir, tempdir};

/// A freshly migrated on-disk store. Keep the `TempDir` alive for the test.
pub async fn create_test_store() -> (Arc<StatusRepository>, TempDir) {
    let dir = tempdir().expect("tempdir");
    let store = open_store(dir.path().join("status.db")).await.expect("open store");
    (store, dir)
}

pub fn record_at(timestamp: DateTime<Utc>, status_code: i64) -> StatusRecord {
    StatusRecord::new(timestamp, (200..400).contains(&status_code), 25, status_code)
}

/// Write a row the way older databases stored it: naive `YYYY-MM-DD HH:MM:SS`.
pub async fn insert_legacy_row(dir: &TempDir, timestamp: DateTime<Utc>, status_code: i64) {
    let db = libsql::Builder::new_local(dir.path().join("status.db"))
        .build()
        .await
        .expect("open database");
    let conn = db.connect().expect("connect");
    conn.execute(
        "INSERT INTO status_history (timestamp, is_up, response_time_ms, status_code) VALUES (?, ?, 25, ?)",
        libsql::params![
            timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            i64::from((200..400).contains(&status_code)),
            status_code
        ],
    )
    .await
    .expect("insert legacy row");
}

pub async fn append_all(store: &dyn StatusStore, records: &[StatusRecord]) {
    for record in records {
        store.append(record).await.expect("append");
    }
}
