#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use containers::{Epoch, EpochFilter, EpochRef, SlotRecord};
use explorer::{ClientError, EpochClient, EpochSlotEntry};
use parking_lot::Mutex;
use storage::{MemorySlotStore, SlotStore, StoreError};
use tokio::time::Instant;

// Mock explorer for testing
#[derive(Default)]
pub struct MockExplorer {
    finalized: Option<u64>,
    epochs: HashMap<String, Vec<EpochSlotEntry>>,
    failing: HashSet<String>,
    malformed: HashSet<String>,
    calls: Mutex<Vec<(EpochRef, Instant)>>,
    finalized_calls: Mutex<usize>,
}

impl MockExplorer {
    pub fn new(finalized: u64) -> Self {
        Self {
            finalized: Some(finalized),
            ..Default::default()
        }
    }

    /// An explorer whose finalized lookup always fails.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn with_epoch(mut self, epoch: EpochRef, entries: Vec<EpochSlotEntry>) -> Self {
        self.epochs.insert(epoch.to_string(), entries);
        self
    }

    pub fn failing_at(mut self, epoch: EpochRef) -> Self {
        self.failing.insert(epoch.to_string());
        self
    }

    /// Answers `epoch` with a body that does not decode.
    pub fn malformed_at(mut self, epoch: EpochRef) -> Self {
        self.malformed.insert(epoch.to_string());
        self
    }

    pub fn fetched(&self) -> Vec<EpochRef> {
        self.calls.lock().iter().map(|(epoch, _)| *epoch).collect()
    }

    pub fn fetch_times(&self) -> Vec<Instant> {
        self.calls.lock().iter().map(|(_, at)| *at).collect()
    }

    pub fn finalized_calls(&self) -> usize {
        *self.finalized_calls.lock()
    }
}

fn unavailable(endpoint: String) -> ClientError {
    ClientError::Status { endpoint, status: 503 }
}

#[async_trait]
impl EpochClient for MockExplorer {
    async fn fetch_epoch(&self, epoch: EpochRef) -> Result<Vec<EpochSlotEntry>, ClientError> {
        self.calls.lock().push((epoch, Instant::now()));

        let key = epoch.to_string();
        if self.failing.contains(&key) {
            return Err(unavailable(format!("mock/epoch/{key}/slots")));
        }
        if self.malformed.contains(&key) {
            return Err(ClientError::malformed(
                format!("mock/epoch/{key}/slots"),
                "invalid type: string \"nope\", expected a sequence",
            ));
        }
        Ok(self.epochs.get(&key).cloned().unwrap_or_default())
    }

    async fn fetch_finalized_epoch(&self) -> Result<Epoch, ClientError> {
        *self.finalized_calls.lock() += 1;
        self.finalized
            .map(Epoch)
            .ok_or_else(|| unavailable("mock/epoch/finalized".to_string()))
    }
}

/// Memory store that can be told to reject reads or specific epochs' writes.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemorySlotStore,
    reject_epochs: HashSet<u64>,
    reject_reads: bool,
    insert_calls: Mutex<usize>,
}

impl FlakyStore {
    pub fn with_records(records: Vec<SlotRecord>) -> Self {
        Self {
            inner: MemorySlotStore::with_records(records),
            ..Default::default()
        }
    }

    pub fn rejecting_epoch(mut self, epoch: u64) -> Self {
        self.reject_epochs.insert(epoch);
        self
    }

    pub fn rejecting_reads(mut self) -> Self {
        self.reject_reads = true;
        self
    }

    pub fn records(&self) -> Vec<SlotRecord> {
        self.inner.records()
    }

    pub fn insert_calls(&self) -> usize {
        *self.insert_calls.lock()
    }
}

#[async_trait]
impl SlotStore for FlakyStore {
    async fn insert_many(&self, records: &[SlotRecord]) -> Result<(), StoreError> {
        *self.insert_calls.lock() += 1;
        if records.iter().any(|record| self.reject_epochs.contains(&record.epoch.0)) {
            return Err(StoreError::Backend("disk full".to_string()));
        }
        self.inner.insert_many(records).await
    }

    async fn latest_synced_epoch(&self) -> Result<Option<Epoch>, StoreError> {
        if self.reject_reads {
            return Err(StoreError::Backend("connection reset".to_string()));
        }
        self.inner.latest_synced_epoch().await
    }

    async fn query(&self, filter: EpochFilter) -> Result<Vec<SlotRecord>, StoreError> {
        self.inner.query(filter).await
    }
}

pub fn entry(epoch: u64, slot: u64, graffiti: &str) -> EpochSlotEntry {
    EpochSlotEntry {
        epoch,
        slot,
        graffiti_text: graffiti.to_string(),
        proposer: slot % 100,
        exec_fee_recipient: format!("0xfee{slot}"),
        exec_block_hash: format!("0xhash{slot}"),
        exec_block_number: 17_000_000 + slot,
    }
}

pub fn stored(epoch: u64, slot: u64, graffiti: &str) -> SlotRecord {
    epoch_sync::transform_entry(entry(epoch, slot, graffiti)).unwrap()
}

pub fn numbered(epoch: u64) -> EpochRef {
    EpochRef::Numbered(Epoch(epoch))
}
