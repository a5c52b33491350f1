use containers::{Epoch, EpochRef, SlotRecord};

/// A batch that was fetched and transformed but did not reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceFailure {
    pub epoch: Epoch,
    pub records: usize,
    pub error: String,
}

/// What one sync run did.
///
/// `records` holds everything fetched and transformed, whether or not the
/// store accepted it. `persistence_failures` lists the epochs it did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub start: EpochRef,
    pub boundary: Epoch,
    pub epochs: Vec<Epoch>,
    pub records: Vec<SlotRecord>,
    pub persistence_failures: Vec<PersistenceFailure>,
}

impl SyncOutcome {
    pub fn new(start: EpochRef, boundary: Epoch) -> Self {
        Self {
            start,
            boundary,
            epochs: Vec::new(),
            records: Vec::new(),
            persistence_failures: Vec::new(),
        }
    }

    /// True when every walked batch was stored.
    pub fn is_fully_persisted(&self) -> bool {
        self.persistence_failures.is_empty()
    }
}
