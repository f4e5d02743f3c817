//! Closed-form solution of the normalized unit oscillator.

use lc_core::{Mode, defaults, linspace};

use crate::error::SimResult;
use crate::trajectory::{Trajectory, TrajectoryProvider};

/// q̈ + q = 0 with q(0) = 1, q̇(0) = 0, sampled uniformly over `[0, tau_end]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalyticalTrajectory {
    pub tau_end: f64,
    pub samples: usize,
}

impl Default for AnalyticalTrajectory {
    fn default() -> Self {
        Self {
            tau_end: defaults::TAU_END,
            samples: defaults::SAMPLE_COUNT,
        }
    }
}

impl AnalyticalTrajectory {
    pub fn new(tau_end: f64, samples: usize) -> Self {
        Self { tau_end, samples }
    }

    /// Sample the exact solution; never fails. A negative or NaN `tau_end`
    /// collapses the domain to `[0, 0]`.
    pub fn generate(&self) -> Trajectory {
        let tau = linspace(0.0, self.tau_end.max(0.0), self.samples);
        let q = tau.iter().map(|t| t.cos()).collect();
        let i = tau.iter().map(|t| -t.sin()).collect();
        Trajectory::from_sorted_columns(Mode::Analytical, 1.0, tau, q, i)
    }
}

impl TrajectoryProvider for AnalyticalTrajectory {
    fn mode(&self) -> Mode {
        Mode::Analytical
    }

    fn trajectory(&self) -> SimResult<Trajectory> {
        Ok(self.generate())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn stays_on_unit_circle(tau_end in 0.0_f64..2000.0, n in 2_usize..2000) {
            let tr = AnalyticalTrajectory::new(tau_end, n).generate();
            for s in tr.samples() {
                prop_assert!((s.q * s.q + s.i * s.i - 1.0).abs() < 1e-12);
            }
        }
    }
}
