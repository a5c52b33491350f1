use containers::{BlockNumber, Epoch, EpochFilter, Slot, SlotRecord, ValidatorIndex};
use pretty_assertions::assert_eq;
use storage::{SlotStore, SqliteSlotStore};

fn record(epoch: u64, slot: u64, graffiti: &str) -> SlotRecord {
    SlotRecord {
        epoch: Epoch(epoch),
        slot_number: Slot(slot),
        graffiti: graffiti.to_string(),
        proposer: ValidatorIndex(slot * 3),
        exec_fee_recipient: format!("0xfee{slot}"),
        exec_block_hash: format!("0xhash{slot}"),
        exec_block_number: BlockNumber(18_000_000 + slot),
    }
}

async fn store() -> SqliteSlotStore {
    SqliteSlotStore::connect("sqlite::memory:").await.unwrap()
}

#[tokio::test]
async fn test_empty_table_has_no_latest_epoch() {
    let store = store().await;
    assert_eq!(store.latest_synced_epoch().await.unwrap(), None);
    assert!(store.query(EpochFilter::All).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_insert_then_query_all_in_insertion_order() {
    let store = store().await;
    let batch = vec![record(2, 64, "a"), record(1, 33, "b"), record(2, 70, "Say \"hi\", ok")];

    store.insert_many(&batch).await.unwrap();

    assert_eq!(store.query(EpochFilter::All).await.unwrap(), batch);
}

#[tokio::test]
async fn test_latest_synced_epoch_is_maximum() {
    let store = store().await;
    store.insert_many(&[record(7, 224, "x")]).await.unwrap();
    store.insert_many(&[record(3, 96, "y")]).await.unwrap();

    assert_eq!(store.latest_synced_epoch().await.unwrap(), Some(Epoch(7)));
}

#[tokio::test]
async fn test_query_filters() {
    let store = store().await;
    store
        .insert_many(&[record(1, 32, "a"), record(2, 64, "b"), record(3, 96, "c"), record(2, 65, "d")])
        .await
        .unwrap();

    let exact = store.query(EpochFilter::Exact(Epoch(2))).await.unwrap();
    assert_eq!(exact, vec![record(2, 64, "b"), record(2, 65, "d")]);

    let at_least = store.query(EpochFilter::AtLeast(Epoch(2))).await.unwrap();
    assert_eq!(at_least, vec![record(2, 64, "b"), record(3, 96, "c"), record(2, 65, "d")]);

    assert!(store.query(EpochFilter::Exact(Epoch(9))).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_same_epoch_inserted_twice_is_not_deduplicated() {
    let store = store().await;
    store.insert_many(&[record(5, 160, "dup")]).await.unwrap();
    store.insert_many(&[record(5, 160, "dup")]).await.unwrap();

    assert_eq!(store.query(EpochFilter::Exact(Epoch(5))).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_file_database_survives_reconnect() {
    let dir = std::env::temp_dir().join(format!("graffiti-store-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("slots.db");
    let url = format!("sqlite://{}?mode=rwc", path.display());

    {
        let store = SqliteSlotStore::connect(&url).await.unwrap();
        store.insert_many(&[record(11, 352, "persist")]).await.unwrap();
    }

    let reopened = SqliteSlotStore::connect(&url).await.unwrap();
    assert_eq!(reopened.latest_synced_epoch().await.unwrap(), Some(Epoch(11)));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_connect_dispatches_memory_backend() {
    let store = storage::connect(storage::MEMORY_CONNECTION).await.unwrap();
    store.insert_many(&[record(1, 32, "m")]).await.unwrap();
    assert_eq!(store.latest_synced_epoch().await.unwrap(), Some(Epoch(1)));
}
