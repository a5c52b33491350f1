/// Sync orchestrator state machine.
use std::fmt;

use containers::EpochRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No run has started yet.
    Idle,

    /// Reading the highest stored epoch to decide where to resume.
    ResolvingCursor,

    /// Asking the explorer which epoch is finalized. That epoch is the
    /// upper bound of the walk.
    ResolvingBoundary,

    /// Fetching, transforming and persisting one epoch.
    ///
    /// Holds `LatestFinalized` only for the first fetch of a run that
    /// started from an empty store.
    Walking(EpochRef),

    /// Pausing before the next explorer request.
    Waiting,

    /// The cursor moved past the finalized boundary.
    Completed,

    /// A store or explorer read failed and the run stopped.
    Aborted,
}

impl SyncState {
    /// Check if a transition to the target state is valid.
    pub fn can_transition_to(&self, target: SyncState) -> bool {
        match self {
            SyncState::Idle | SyncState::Completed | SyncState::Aborted => {
                matches!(target, SyncState::ResolvingCursor)
            }
            SyncState::ResolvingCursor => {
                matches!(target, SyncState::ResolvingBoundary | SyncState::Aborted)
            }
            SyncState::ResolvingBoundary => matches!(
                target,
                SyncState::Walking(_) | SyncState::Completed | SyncState::Aborted
            ),
            SyncState::Walking(_) => matches!(
                target,
                SyncState::Waiting | SyncState::Completed | SyncState::Aborted
            ),
            SyncState::Waiting => matches!(target, SyncState::Walking(_)),
        }
    }

    /// True while a run is in progress.
    pub fn is_running(&self) -> bool {
        !matches!(self, SyncState::Idle | SyncState::Completed | SyncState::Aborted)
    }
}

impl Default for SyncState {
    fn default() -> Self {
        SyncState::Idle
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncState::Idle => f.write_str("idle"),
            SyncState::ResolvingCursor => f.write_str("resolving_cursor"),
            SyncState::ResolvingBoundary => f.write_str("resolving_boundary"),
            SyncState::Walking(epoch) => write!(f, "walking({epoch})"),
            SyncState::Waiting => f.write_str("waiting"),
            SyncState::Completed => f.write_str("completed"),
            SyncState::Aborted => f.write_str("aborted"),
        }
    }
}
