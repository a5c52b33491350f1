//! Read access to a beacon chain explorer API.
//!
//! The sync engine needs exactly two remote reads: the slot listing of one
//! epoch and the number of the current finalized epoch. [`EpochClient`] is
//! the seam the engine consumes; [`BeaconchainClient`] is the HTTP
//! implementation against a versioned explorer API.

pub mod client;
pub mod error;
pub mod serde_utils;
pub mod types;

pub use client::{BeaconchainClient, EpochClient};
pub use error::ClientError;
pub use types::{ApiResponse, EpochSlotEntry, FinalizedEpoch};
