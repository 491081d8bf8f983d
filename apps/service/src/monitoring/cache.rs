use tokio::sync::watch;

use crate::database::StatusRecord;

/// Single-slot, last-writer-wins holder of the most recent probe outcome.
///
/// Values are replaced wholesale; readers get a clone and never observe a
/// partially updated record. Empty until the first probe completes (or until
/// a reader seeds it from the store after a restart).
#[derive(Debug)]
pub struct LatestStatus {
    slot: watch::Sender<Option<StatusRecord>>,
}

impl LatestStatus {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self { slot }
    }

    /// Replace the cached record
    pub fn store(&self, record: StatusRecord) {
        self.slot.send_replace(Some(record));
    }

    /// Fill the slot only if it is still empty. Returns whether it was filled.
    ///
    /// Used when rebuilding the cache from the store, so a record read from
    /// disk never replaces a newer one the prober stored in the meantime.
    pub fn seed(&self, record: StatusRecord) -> bool {
        self.slot.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(record);
            true
        })
    }

    /// Current cached record, if any
    pub fn load(&self) -> Option<StatusRecord> {
        self.slot.borrow().clone()
    }

    /// Receiver that is notified whenever a new record is stored
    pub fn subscribe(&self) -> watch::Receiver<Option<StatusRecord>> {
        self.slot.subscribe()
    }
}

impl Default for LatestStatus {
    fn default() -> Self {
        Self::new()
    }
}
