//! Shared application service layer for the LC oscillation viewer.
//!
//! This crate provides one interface for both CLI and GUI frontends:
//! configuration loading, cached trajectory requests, per-host playback
//! sessions and result queries.

pub mod config;
pub mod error;
pub mod query;
pub mod session;
pub mod trajectory_service;

pub use config::{AnimationConfig, CacheConfig, DomainConfig, SimConfig, load_yaml, save_yaml};
pub use error::{AppError, AppResult};
pub use query::{
    CsvUnits, TrajectorySummary, export_frame_csv, export_trajectory_csv, get_trajectory_summary,
};
pub use session::Session;
pub use trajectory_service::{TrajectoryRequest, TrajectoryResponse, TrajectoryService};
