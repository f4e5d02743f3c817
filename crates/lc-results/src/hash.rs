//! Content-based hashing for trajectory IDs.

use sha2::{Digest, Sha256};

use crate::types::{TrajectoryId, TrajectoryKey};

/// Bumped whenever provider output for an unchanged key would change.
pub const ENGINE_VERSION: &str = "dp45-0.1.0";

pub fn compute_trajectory_id(key: &TrajectoryKey, engine_version: &str) -> TrajectoryId {
    let mut hasher = Sha256::new();

    let key_json = serde_json::to_string(key).unwrap_or_default();
    hasher.update(key_json.as_bytes());

    hasher.update(engine_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
