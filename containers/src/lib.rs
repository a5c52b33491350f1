pub mod filter;
pub mod record;
pub mod slot;
pub mod types;

pub use filter::EpochFilter;
pub use record::SlotRecord;
pub use slot::{Epoch, EpochRef, Slot};
pub use types::{BlockNumber, ValidatorIndex};
