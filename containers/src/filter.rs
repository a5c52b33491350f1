use crate::Epoch;

/// Selects which stored records an export reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EpochFilter {
    #[default]
    All,
    /// `epoch == N`
    Exact(Epoch),
    /// `epoch >= N`
    AtLeast(Epoch),
}

impl EpochFilter {
    pub fn matches(&self, epoch: Epoch) -> bool {
        match self {
            EpochFilter::All => true,
            EpochFilter::Exact(target) => epoch == *target,
            EpochFilter::AtLeast(lower) => epoch >= *lower,
        }
    }
}
