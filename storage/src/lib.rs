//! Durable storage of slot records.
//!
//! [`SlotStore`] is the narrow interface the sync engine and the exporter
//! consume. Two backends are provided:
//!
//! - **MemorySlotStore**: process-local, insertion ordered, no setup
//! - **SqliteSlotStore**: a single `slots` table indexed on `epoch`
//!
//! Neither backend deduplicates. Re-syncing an epoch appends its records
//! again; uniqueness of `(epoch, slot_number)` is not enforced.

pub mod error;
pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use containers::{Epoch, EpochFilter, SlotRecord};
use tracing::info;

pub use error::StoreError;
pub use memory::MemorySlotStore;
pub use sqlite::SqliteSlotStore;

/// Connection string selecting the in-memory backend.
pub const MEMORY_CONNECTION: &str = "memory";

#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Appends `records` in order.
    async fn insert_many(&self, records: &[SlotRecord]) -> Result<(), StoreError>;

    /// Highest stored epoch, `None` when the store is empty.
    async fn latest_synced_epoch(&self) -> Result<Option<Epoch>, StoreError>;

    /// Records matching `filter`, in insertion order.
    async fn query(&self, filter: EpochFilter) -> Result<Vec<SlotRecord>, StoreError>;
}

#[async_trait]
impl<T: SlotStore + ?Sized> SlotStore for Arc<T> {
    async fn insert_many(&self, records: &[SlotRecord]) -> Result<(), StoreError> {
        (**self).insert_many(records).await
    }

    async fn latest_synced_epoch(&self) -> Result<Option<Epoch>, StoreError> {
        (**self).latest_synced_epoch().await
    }

    async fn query(&self, filter: EpochFilter) -> Result<Vec<SlotRecord>, StoreError> {
        (**self).query(filter).await
    }
}

/// Opens the backend named by `connection`.
///
/// `memory` selects [`MemorySlotStore`]; anything else is handed to sqlx as
/// an SQLite URL (`sqlite://graffiti.db?mode=rwc`, `sqlite::memory:`).
pub async fn connect(connection: &str) -> Result<Arc<dyn SlotStore>, StoreError> {
    if connection == MEMORY_CONNECTION {
        info!("Using in-memory slot store");
        return Ok(Arc::new(MemorySlotStore::new()));
    }

    let store = SqliteSlotStore::connect(connection).await?;
    Ok(Arc::new(store))
}
