//! Graffiti scraper service.
//!
//! Wires the explorer client, the slot store and the sync orchestrator
//! behind a small HTTP surface.

pub mod cli;
pub mod routes;

pub use cli::{Args, ExportMode, ResumePolicyArg};
pub use routes::{router, ApiError, AppState};
