//! Sync orchestrator.
//!
//! The orchestrator is the entry point for one ingestion run. It coordinates:
//! - SlotStore: where the previous run stopped
//! - EpochClient: the finalized boundary and each epoch's slots
//! - Transform: which slots become records
//! - State machine: RESOLVING_CURSOR -> RESOLVING_BOUNDARY -> WALKING <-> WAITING -> COMPLETED

use std::sync::Arc;
use std::time::Instant;

use containers::{Epoch, EpochRef};
use explorer::EpochClient;
use metrics::SharedMetrics;
use parking_lot::Mutex;
use storage::SlotStore;
use tracing::{debug, info, warn};

use crate::{
    config::SyncConfig,
    error::SyncError,
    outcome::{PersistenceFailure, SyncOutcome},
    states::SyncState,
    transform::transform_epoch,
};

/// Walks epochs from the resume cursor up to the finalized boundary.
///
/// One run issues its explorer requests strictly one after another with
/// `request_interval` between them. Running two syncs at once against the
/// same store is not guarded here: both would resolve the same cursor and
/// duplicate work. Callers serialize runs.
pub struct SyncOrchestrator<C, S: ?Sized> {
    client: C,
    store: Arc<S>,
    config: SyncConfig,
    metrics: Option<SharedMetrics>,
    state: Mutex<SyncState>,
}

impl<C, S> SyncOrchestrator<C, S>
where
    C: EpochClient,
    S: SlotStore + ?Sized,
{
    pub fn new(client: C, store: Arc<S>, config: SyncConfig) -> Self {
        Self {
            client,
            store,
            config,
            metrics: None,
            state: Mutex::new(SyncState::default()),
        }
    }

    pub fn with_metrics(mut self, metrics: SharedMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Get current sync state.
    pub fn state(&self) -> SyncState {
        *self.state.lock()
    }

    /// Where the next run starts.
    ///
    /// With records stored, the highest stored epoch adjusted by the
    /// resume policy. With an empty store, whatever the explorer reports
    /// as finalized at the time of the first fetch.
    pub async fn resolve_cursor(&self) -> Result<EpochRef, SyncError> {
        let latest = self.store.latest_synced_epoch().await.map_err(SyncError::Cursor)?;

        Ok(match latest {
            Some(epoch) => EpochRef::Numbered(self.config.resume_policy.start_from(epoch)),
            None => EpochRef::LatestFinalized,
        })
    }

    /// Run one sync to the current finalized epoch.
    ///
    /// Store write failures do not stop the walk; they are collected in
    /// the outcome. An explorer failure stops the walk and is returned,
    /// leaving every batch stored so far in place.
    pub async fn sync(&self) -> Result<SyncOutcome, SyncError> {
        let result = self.run().await;

        if let Some(metrics) = &self.metrics {
            let label = match &result {
                Ok(outcome) if outcome.is_fully_persisted() => "completed",
                Ok(_) => "completed_with_failures",
                Err(SyncError::Interrupted { .. }) => "interrupted",
                Err(_) => "aborted",
            };
            metrics.inc_sync_runs(label);
        }

        result
    }

    async fn run(&self) -> Result<SyncOutcome, SyncError> {
        self.begin_run();
        let start = match self.resolve_cursor().await {
            Ok(start) => start,
            Err(err) => {
                warn!(error = %err, "Aborting sync: cursor resolution failed");
                self.transition(SyncState::Aborted);
                return Err(err);
            }
        };

        self.transition(SyncState::ResolvingBoundary);
        let boundary = match self.client.fetch_finalized_epoch().await {
            Ok(boundary) => boundary,
            Err(err) => {
                warn!(error = %err, "Aborting sync: finalized epoch lookup failed");
                self.transition(SyncState::Aborted);
                return Err(SyncError::Boundary(err));
            }
        };
        if let Some(metrics) = &self.metrics {
            metrics.set_finalized_epoch(boundary.0);
        }

        info!(start = %start, finalized = %boundary, "Starting epoch walk");

        let mut outcome = SyncOutcome::new(start, boundary);
        let mut cursor = start;

        loop {
            if cursor.number().is_some_and(|epoch| epoch > boundary) {
                break;
            }

            self.transition(SyncState::Walking(cursor));
            let epoch = match self.walk_epoch(cursor, boundary, &mut outcome).await {
                Ok(epoch) => epoch,
                Err(source) => {
                    warn!(epoch = %cursor, error = %source, "Aborting sync: epoch fetch failed");
                    self.transition(SyncState::Aborted);
                    return Err(SyncError::Interrupted {
                        epoch: cursor,
                        source,
                        partial: Box::new(outcome),
                    });
                }
            };

            // A walk resolved at u64::MAX cannot advance; stop rather than refetch it.
            let next = epoch.next();
            if next > boundary || next == epoch {
                break;
            }
            cursor = EpochRef::Numbered(next);

            self.transition(SyncState::Waiting);
            tokio::time::sleep(self.config.request_interval).await;
        }

        self.transition(SyncState::Completed);
        info!(
            epochs = outcome.epochs.len(),
            records = outcome.records.len(),
            persistence_failures = outcome.persistence_failures.len(),
            "Sync completed"
        );

        Ok(outcome)
    }

    /// Fetch, transform and persist one epoch. Returns the concrete epoch
    /// walked, which for `LatestFinalized` comes from the response itself.
    async fn walk_epoch(
        &self,
        cursor: EpochRef,
        boundary: Epoch,
        outcome: &mut SyncOutcome,
    ) -> Result<Epoch, explorer::ClientError> {
        let started = Instant::now();
        let entries = self.client.fetch_epoch(cursor).await?;
        if let Some(metrics) = &self.metrics {
            metrics.observe_epoch_fetch_time(started.elapsed().as_secs_f64());
        }

        // An empty finalized listing carries no epoch number; the boundary
        // fetched moments earlier stands in for it.
        let epoch = cursor.number().unwrap_or_else(|| {
            entries
                .first()
                .map(|entry| Epoch(entry.epoch))
                .unwrap_or(boundary)
        });

        let batch = transform_epoch(entries);
        debug!(epoch = %epoch, records = batch.len(), "Transformed epoch");

        if batch.is_empty() {
            debug!(epoch = %epoch, "No graffiti in epoch, nothing to persist");
        } else {
            match self.store.insert_many(&batch).await {
                Ok(()) => {
                    if let Some(metrics) = &self.metrics {
                        metrics.inc_records_ingested(batch.len() as u64);
                    }
                }
                Err(err) => {
                    warn!(
                        epoch = %epoch,
                        records = batch.len(),
                        error = %err,
                        "Failed to persist epoch, next run will fetch it again"
                    );
                    if let Some(metrics) = &self.metrics {
                        metrics.inc_persistence_failures();
                    }
                    outcome.persistence_failures.push(PersistenceFailure {
                        epoch,
                        records: batch.len(),
                        error: err.to_string(),
                    });
                }
            }
        }

        if let Some(metrics) = &self.metrics {
            metrics.inc_epochs_walked();
            metrics.set_last_walked_epoch(epoch.0);
        }

        outcome.epochs.push(epoch);
        outcome.records.extend(batch);
        Ok(epoch)
    }

    /// Enters `ResolvingCursor` from any state.
    ///
    /// A run whose future was dropped mid-walk leaves its last state behind;
    /// the next run starts over from it.
    fn begin_run(&self) {
        let mut state = self.state.lock();
        if state.is_running() {
            warn!(from = ?*state, "Previous sync run ended without finishing, starting over");
        }
        debug!(from = ?*state, to = ?SyncState::ResolvingCursor, "Sync state transition");
        *state = SyncState::ResolvingCursor;
    }

    fn transition(&self, target: SyncState) {
        let mut state = self.state.lock();
        if *state == target {
            return;
        }
        if !state.can_transition_to(target) {
            warn!(from = ?*state, to = ?target, "Invalid state transition attempted");
            return;
        }
        debug!(from = ?*state, to = ?target, "Sync state transition");
        *state = target;
    }
}
