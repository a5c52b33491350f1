use containers::{BlockNumber, Epoch, Slot, SlotRecord, ValidatorIndex};
use explorer::EpochSlotEntry;

/// Normalizes one explorer entry. Entries without graffiti yield `None`.
pub fn transform_entry(entry: EpochSlotEntry) -> Option<SlotRecord> {
    if entry.graffiti_text.is_empty() {
        return None;
    }

    Some(SlotRecord {
        epoch: Epoch(entry.epoch),
        slot_number: Slot(entry.slot),
        graffiti: entry.graffiti_text,
        proposer: ValidatorIndex(entry.proposer),
        exec_fee_recipient: entry.exec_fee_recipient,
        exec_block_hash: entry.exec_block_hash,
        exec_block_number: BlockNumber(entry.exec_block_number),
    })
}

/// Normalizes an epoch's slot listing, keeping explorer order.
pub fn transform_epoch(entries: Vec<EpochSlotEntry>) -> Vec<SlotRecord> {
    entries.into_iter().filter_map(transform_entry).collect()
}
