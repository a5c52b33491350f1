use serde::{Deserialize, Serialize};

use crate::serde_utils::null_as_default;

/// Response body shared by every explorer endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub status: Option<String>,
    pub data: T,
}

/// One slot from an epoch's slot listing, as the explorer reports it.
///
/// Proposers that left graffiti unset come back with an empty
/// `graffiti_text`; missed slots and pre-merge slots carry no execution
/// fields.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EpochSlotEntry {
    pub epoch: u64,
    pub slot: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub graffiti_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub proposer: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exec_fee_recipient: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exec_block_hash: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exec_block_number: u64,
}

/// Payload of the finalized-epoch lookup. Only `epoch` is read.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FinalizedEpoch {
    #[serde(default)]
    pub epoch: Option<u64>,
}
