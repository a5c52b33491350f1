/// Incremental epoch sync for the graffiti scraper.
///
/// Pulls per-slot proposer metadata from a beacon chain explorer and appends
/// it to a slot store, one epoch at a time. It includes:
///
/// - **Transform**: Drops slots without graffiti and normalizes the rest
/// - **Orchestrator**: Resolves the resume cursor and the finalized
///   boundary, then walks the epochs between them
///
/// ## State Machine
///
/// - **IDLE**: No run has started
/// - **RESOLVING_CURSOR**: Reading the highest stored epoch
/// - **RESOLVING_BOUNDARY**: Asking the explorer for the finalized epoch
/// - **WALKING**: Fetching, transforming and persisting one epoch
/// - **WAITING**: Pausing between two explorer requests
/// - **COMPLETED**: Cursor passed the boundary
/// - **ABORTED**: A store or explorer read failed
///
/// ## Failure Policy
///
/// Progress is tracked only through what the store holds. A failed write is
/// recorded in the outcome and the walk continues; the next run's cursor
/// resolution re-fetches that epoch. A failed explorer read ends the run.
pub mod config;
pub mod error;
pub mod outcome;
pub mod service;
pub mod states;
pub mod transform;

pub use config::{ResumePolicy, SyncConfig};
pub use error::SyncError;
pub use outcome::{PersistenceFailure, SyncOutcome};
pub use service::SyncOrchestrator;
pub use states::SyncState;
pub use transform::{transform_entry, transform_epoch};
