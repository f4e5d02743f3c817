//! lc-results: in-memory trajectory cache.
//!
//! Trajectories are keyed by the parameters that produced them, identified
//! by a content hash, computed at most once per key and shared via `Arc`.

pub mod cache;
pub mod hash;
pub mod types;

pub use cache::{CachedTrajectory, DEFAULT_CAPACITY, TrajectoryCache};
pub use hash::{ENGINE_VERSION, compute_trajectory_id};
pub use types::*;

pub type CacheResult<T> = Result<T, CacheError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    #[error("Trajectory computation failed: {0}")]
    Sim(#[from] lc_sim::SimError),

    #[error("Cache lock poisoned")]
    Poisoned,
}
