use containers::EpochRef;
use explorer::ClientError;
use storage::StoreError;
use thiserror::Error;

use crate::outcome::SyncOutcome;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The store could not report its highest epoch. Nothing was fetched.
    #[error("failed to resolve sync cursor: {0}")]
    Cursor(#[source] StoreError),

    /// The explorer could not report its finalized epoch. Nothing was fetched.
    #[error("failed to resolve finalized boundary: {0}")]
    Boundary(#[source] ClientError),

    /// An epoch fetch failed mid-walk. Batches stored before it are kept.
    #[error("sync interrupted at epoch {epoch}: {source}")]
    Interrupted {
        epoch: EpochRef,
        #[source]
        source: ClientError,
        partial: Box<SyncOutcome>,
    },
}

impl SyncError {
    /// True when the explorer, not the store, caused the failure.
    pub fn is_remote(&self) -> bool {
        matches!(self, SyncError::Boundary(_) | SyncError::Interrupted { .. })
    }

    /// Work completed before the failure, if the walk had started.
    pub fn partial(&self) -> Option<&SyncOutcome> {
        match self {
            SyncError::Interrupted { partial, .. } => Some(partial),
            _ => None,
        }
    }
}
