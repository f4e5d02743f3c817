//! Trajectory requests through the shared cache.

use std::sync::Arc;
use std::time::Instant;

use lc_core::{CircuitParams, Mode, defaults};
use lc_results::{TrajectoryCache, TrajectoryId, TrajectoryKey};
use lc_sim::Trajectory;

use crate::config::SimConfig;
use crate::error::AppResult;

/// What a host asks for: a mode, a circuit and a normalized domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryRequest {
    pub mode: Mode,
    pub circuit: CircuitParams,
    pub tau_end: f64,
    pub samples: usize,
}

impl Default for TrajectoryRequest {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            circuit: CircuitParams::default(),
            tau_end: defaults::TAU_END,
            samples: defaults::SAMPLE_COUNT,
        }
    }
}

impl TrajectoryRequest {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            mode: config.mode,
            circuit: config.circuit,
            tau_end: config.domain.tau_end,
            samples: config.domain.samples,
        }
    }

    /// Cache key; numerical requests are converted to `[0, τ_end·√(LC)]`.
    pub fn key(&self) -> AppResult<TrajectoryKey> {
        Ok(TrajectoryKey::for_request(
            self.mode,
            &self.circuit,
            self.tau_end,
            self.samples,
        )?)
    }
}

#[derive(Debug, Clone)]
pub struct TrajectoryResponse {
    pub id: TrajectoryId,
    pub trajectory: Arc<Trajectory>,
    pub loaded_from_cache: bool,
    pub elapsed_s: f64,
}

/// Cheap to clone; clones share one cache.
#[derive(Clone)]
pub struct TrajectoryService {
    cache: Arc<TrajectoryCache>,
}

impl Default for TrajectoryService {
    fn default() -> Self {
        Self::new(lc_results::DEFAULT_CAPACITY)
    }
}

impl TrajectoryService {
    pub fn new(capacity: usize) -> Self {
        Self::with_cache(Arc::new(TrajectoryCache::new(capacity)))
    }

    pub fn with_cache(cache: Arc<TrajectoryCache>) -> Self {
        Self { cache }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.cache.capacity)
    }

    pub fn cache(&self) -> &TrajectoryCache {
        &self.cache
    }

    pub fn get_trajectory(&self, request: &TrajectoryRequest) -> AppResult<TrajectoryResponse> {
        let started = Instant::now();
        let key = request.key()?;
        let cached = self.cache.get_or_compute(&key)?;
        let elapsed_s = started.elapsed().as_secs_f64();

        tracing::info!(
            mode = request.mode.label(),
            samples = cached.trajectory.len(),
            cached = cached.from_cache,
            elapsed_s,
            "trajectory ready"
        );

        Ok(TrajectoryResponse {
            id: cached.id,
            trajectory: cached.trajectory,
            loaded_from_cache: cached.from_cache,
            elapsed_s,
        })
    }

    /// Drop the cached trajectory for `request`, if any.
    pub fn invalidate(&self, request: &TrajectoryRequest) -> AppResult<bool> {
        Ok(self.cache.invalidate(&request.key()?)?)
    }

    pub fn clear(&self) -> AppResult<()> {
        Ok(self.cache.clear()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn second_request_is_cached() {
        let service = TrajectoryService::default();
        let request = TrajectoryRequest {
            samples: 500,
            tau_end: 20.0,
            ..TrajectoryRequest::default()
        };
        let first = service.get_trajectory(&request).unwrap();
        let second = service.clone().get_trajectory(&request).unwrap();
        assert!(!first.loaded_from_cache);
        assert!(second.loaded_from_cache);
        assert!(Arc::ptr_eq(&first.trajectory, &second.trajectory));
    }

    #[test]
    fn invalid_circuit_is_reported_for_numerical() {
        let service = TrajectoryService::default();
        let request = TrajectoryRequest {
            mode: Mode::Numerical,
            circuit: CircuitParams {
                capacitance_f: -1.0,
                ..CircuitParams::default()
            },
            ..TrajectoryRequest::default()
        };
        assert!(matches!(
            service.get_trajectory(&request),
            Err(AppError::InvalidParameter(_))
        ));
        assert!(service.cache().is_empty());
    }
}
