use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use containers::{Epoch, EpochFilter, SlotRecord};
use epoch_sync::{SyncConfig, SyncError, SyncOrchestrator};
use explorer::EpochClient;
use export::{CsvExporter, CONTENT_TYPE};
use metrics::{MetricsError, SharedMetrics};
use serde::Serialize;
use storage::{SlotStore, StoreError};
use tokio::sync::Mutex;
use tokio::task::JoinError;
use tracing::{info, warn};

use crate::cli::ExportMode;

pub type Orchestrator = SyncOrchestrator<Arc<dyn EpochClient>, dyn SlotStore>;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub state: String,
    pub running: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("a sync run is already in progress")]
    SyncInProgress,

    #[error("invalid epoch: {0}")]
    InvalidEpoch(String),

    #[error("{0}")]
    Sync(#[from] SyncError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("failed to render metrics: {0}")]
    Metrics(#[from] MetricsError),

    #[error("sync task failed: {0}")]
    Task(#[from] JoinError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::SyncInProgress => StatusCode::CONFLICT,
            ApiError::InvalidEpoch(_) => StatusCode::BAD_REQUEST,
            ApiError::Sync(err) if err.is_remote() => StatusCode::BAD_GATEWAY,
            ApiError::Sync(_) | ApiError::Store(_) | ApiError::Metrics(_) | ApiError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (code, Json(body)).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    sync: Arc<Orchestrator>,
    exporter: Arc<CsvExporter<dyn SlotStore>>,
    metrics: SharedMetrics,
    export_mode: ExportMode,
    /// Held for the duration of one sync run.
    sync_guard: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        client: Arc<dyn EpochClient>,
        store: Arc<dyn SlotStore>,
        config: SyncConfig,
        metrics: SharedMetrics,
        export_mode: ExportMode,
    ) -> Self {
        let sync = SyncOrchestrator::new(client, store.clone(), config).with_metrics(metrics.clone());

        Self {
            sync: Arc::new(sync),
            exporter: Arc::new(CsvExporter::new(store)),
            metrics,
            export_mode,
            sync_guard: Arc::new(Mutex::new(())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/sync", get(sync_handler))
        .route("/status", get(status_handler))
        .route("/export", get(export_all_handler))
        .route("/export/:epoch", get(export_epoch_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

async fn sync_handler(State(state): State<AppState>) -> Result<Json<Vec<SlotRecord>>, ApiError> {
    let Ok(guard) = state.sync_guard.clone().try_lock_owned() else {
        warn!("Rejecting sync request, a run is already active");
        return Err(ApiError::SyncInProgress);
    };

    // Detached from the request so a client disconnect cannot cancel a started run.
    let sync = state.sync.clone();
    let run = tokio::spawn(async move {
        let _guard = guard;
        sync.sync().await
    });

    let outcome = run.await??;
    info!(
        records = outcome.records.len(),
        persistence_failures = outcome.persistence_failures.len(),
        "Sync request served"
    );

    Ok(Json(outcome.records))
}

async fn status_handler(State(state): State<AppState>) -> Json<StatusBody> {
    let current = state.sync.state();
    Json(StatusBody {
        state: current.to_string(),
        running: current.is_running(),
    })
}

async fn export_all_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    export(&state, EpochFilter::All).await
}

async fn export_epoch_handler(
    State(state): State<AppState>,
    Path(epoch): Path<String>,
) -> Result<Response, ApiError> {
    let epoch: u64 = epoch.parse().map_err(|_| ApiError::InvalidEpoch(epoch.clone()))?;
    export(&state, state.export_mode.filter(Epoch(epoch))).await
}

async fn export(state: &AppState, filter: EpochFilter) -> Result<Response, ApiError> {
    let body = state.exporter.export(filter).await?;
    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response())
}

async fn metrics_handler(State(state): State<AppState>) -> Result<String, ApiError> {
    Ok(state.metrics.gather()?)
}
