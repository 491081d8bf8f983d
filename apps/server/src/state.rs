use std::sync::Arc;

use statusboard_service::{LatestStatus, StatusRecord, StatusStore};

/// Shared handler state
pub struct AppState {
    pub store: Arc<dyn StatusStore>,
    pub latest: Arc<LatestStatus>,
    pub target_url: String,
    pub history_days: u32,
}

impl AppState {
    /// Latest known record: the in-memory cache, or the newest stored row
    /// when the cache is still empty (e.g. right after a restart).
    pub async fn current_status(&self) -> anyhow::Result<Option<StatusRecord>> {
        if let Some(record) = self.latest.load() {
            return Ok(Some(record));
        }

        let stored = self.store.latest().await?;
        if let Some(record) = &stored {
            self.latest.seed(record.clone());
        }
        Ok(stored)
    }
}
