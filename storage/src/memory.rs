use async_trait::async_trait;
use containers::{Epoch, EpochFilter, SlotRecord};
use parking_lot::RwLock;

use crate::{SlotStore, StoreError};

/// Slot records held in process memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    records: RwLock<Vec<SlotRecord>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<SlotRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Copy of everything stored.
    pub fn records(&self) -> Vec<SlotRecord> {
        self.records.read().clone()
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn insert_many(&self, records: &[SlotRecord]) -> Result<(), StoreError> {
        self.records.write().extend_from_slice(records);
        Ok(())
    }

    async fn latest_synced_epoch(&self) -> Result<Option<Epoch>, StoreError> {
        Ok(self.records.read().iter().map(|record| record.epoch).max())
    }

    async fn query(&self, filter: EpochFilter) -> Result<Vec<SlotRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|record| filter.matches(record.epoch))
            .cloned()
            .collect())
    }
}
