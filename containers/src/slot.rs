use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Epoch(pub u64);

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Slot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for Epoch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Epoch {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Epoch {
    /// The epoch immediately after this one.
    ///
    /// Saturates at `u64::MAX` so a walk can never wrap back to genesis.
    pub fn next(self) -> Epoch {
        Epoch(self.0.saturating_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies which epoch to ask the explorer for.
///
/// The explorer accepts either a concrete epoch number or the keyword
/// `finalized`, which it resolves to its current finalized epoch at
/// request time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EpochRef {
    /// A concrete epoch number.
    Numbered(Epoch),
    /// Whatever epoch the remote currently considers finalized.
    LatestFinalized,
}

impl EpochRef {
    /// The concrete epoch, if this reference is numbered.
    pub fn number(&self) -> Option<Epoch> {
        match self {
            EpochRef::Numbered(epoch) => Some(*epoch),
            EpochRef::LatestFinalized => None,
        }
    }
}

impl From<Epoch> for EpochRef {
    fn from(epoch: Epoch) -> Self {
        EpochRef::Numbered(epoch)
    }
}

/// Renders the path segment the explorer expects.
impl fmt::Display for EpochRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpochRef::Numbered(epoch) => write!(f, "{}", epoch.0),
            EpochRef::LatestFinalized => f.write_str("finalized"),
        }
    }
}
