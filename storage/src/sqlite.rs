//! SQLite-backed slot store.

use std::str::FromStr;

use async_trait::async_trait;
use containers::{BlockNumber, Epoch, EpochFilter, Slot, SlotRecord, ValidatorIndex};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::{SlotStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS slots (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  epoch INTEGER NOT NULL,
  slot_number INTEGER NOT NULL,
  graffiti TEXT NOT NULL,
  proposer INTEGER NOT NULL,
  exec_fee_recipient TEXT NOT NULL,
  exec_block_hash TEXT NOT NULL,
  exec_block_number INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS slots_epoch_idx ON slots(epoch);
"#;

const SELECT_COLUMNS: &str = "SELECT epoch, slot_number, graffiti, proposer, exec_fee_recipient, \
     exec_block_hash, exec_block_number FROM slots";

#[derive(Clone, Debug)]
pub struct SqliteSlotStore {
    pool: SqlitePool,
}

impl SqliteSlotStore {
    /// Connects to `url` and creates the schema if it is missing.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let mut opts = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::InvalidConnection(e.to_string()))?
            .create_if_missing(true);
        if !in_memory {
            opts = opts.journal_mode(SqliteJournalMode::Wal);
        }

        // Every connection to an in-memory database sees its own database.
        let max_connections = if in_memory { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        sqlx::query(SCHEMA).execute(&pool).await?;

        info!(in_memory, "Connected sqlite slot store");
        Ok(Self { pool })
    }
}

fn to_sql(value: u64, column: &str) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|e| StoreError::backend(column, e))
}

fn from_sql(row: &SqliteRow, column: &str) -> Result<u64, StoreError> {
    let value: i64 = row.try_get(column)?;
    u64::try_from(value).map_err(|e| StoreError::backend(column, e))
}

fn decode_row(row: &SqliteRow) -> Result<SlotRecord, StoreError> {
    Ok(SlotRecord {
        epoch: Epoch(from_sql(row, "epoch")?),
        slot_number: Slot(from_sql(row, "slot_number")?),
        graffiti: row.try_get("graffiti")?,
        proposer: ValidatorIndex(from_sql(row, "proposer")?),
        exec_fee_recipient: row.try_get("exec_fee_recipient")?,
        exec_block_hash: row.try_get("exec_block_hash")?,
        exec_block_number: BlockNumber(from_sql(row, "exec_block_number")?),
    })
}

#[async_trait]
impl SlotStore for SqliteSlotStore {
    async fn insert_many(&self, records: &[SlotRecord]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query(
                r#"
INSERT INTO slots
  (epoch, slot_number, graffiti, proposer, exec_fee_recipient, exec_block_hash, exec_block_number)
VALUES
  (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#,
            )
            .bind(to_sql(record.epoch.0, "epoch")?)
            .bind(to_sql(record.slot_number.0, "slot_number")?)
            .bind(&record.graffiti)
            .bind(to_sql(record.proposer.0, "proposer")?)
            .bind(&record.exec_fee_recipient)
            .bind(&record.exec_block_hash)
            .bind(to_sql(record.exec_block_number.0, "exec_block_number")?)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(records = records.len(), "Inserted slot records");
        Ok(())
    }

    async fn latest_synced_epoch(&self) -> Result<Option<Epoch>, StoreError> {
        let row = sqlx::query("SELECT MAX(epoch) AS epoch FROM slots")
            .fetch_one(&self.pool)
            .await?;

        let max: Option<i64> = row.try_get("epoch")?;
        max.map(|value| {
            u64::try_from(value)
                .map(Epoch)
                .map_err(|e| StoreError::backend("epoch", e))
        })
        .transpose()
    }

    async fn query(&self, filter: EpochFilter) -> Result<Vec<SlotRecord>, StoreError> {
        let (clause, lower) = match filter {
            EpochFilter::All => ("", None),
            EpochFilter::Exact(epoch) => ("WHERE epoch = ?1", Some(epoch)),
            EpochFilter::AtLeast(epoch) => ("WHERE epoch >= ?1", Some(epoch)),
        };
        let sql = format!("{SELECT_COLUMNS} {clause} ORDER BY id");

        let mut query = sqlx::query(&sql);
        if let Some(epoch) = lower {
            query = query.bind(to_sql(epoch.0, "epoch")?);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter().map(decode_row).collect()
    }
}
