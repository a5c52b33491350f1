use serde::{Deserialize, Serialize};

use crate::{BlockNumber, Epoch, Slot, ValidatorIndex};

/// One proposed slot whose block carried non-empty graffiti.
///
/// Field names on the wire and in storage follow the column names the
/// service has always exposed (`slot_number`, `exec_fee_recipient`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotRecord {
    pub epoch: Epoch,
    pub slot_number: Slot,
    pub graffiti: String,
    pub proposer: ValidatorIndex,
    /// Empty when the slot had no execution payload.
    pub exec_fee_recipient: String,
    /// Empty when the slot had no execution payload.
    pub exec_block_hash: String,
    pub exec_block_number: BlockNumber,
}
