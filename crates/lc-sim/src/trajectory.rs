//! Normalized-time trajectory shared by both providers.

use lc_core::Mode;

use crate::error::{SimError, SimResult};

/// Anything that can produce a trajectory.
pub trait TrajectoryProvider {
    fn mode(&self) -> Mode;

    fn trajectory(&self) -> SimResult<Trajectory>;
}

/// One sample of a trajectory.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Normalized time τ = ω·t
    pub tau: f64,
    /// Charge
    pub q: f64,
    /// Current in normalized units, dq/dτ
    pub i: f64,
}

/// Immutable (τ, q, i) columns.
///
/// τ is non-decreasing. `omega_rad_s` records the scale used to normalize
/// time (1.0 for the closed-form unit oscillator), so physical time is
/// `τ / ω` and physical current is `ω · i`.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    mode: Mode,
    omega_rad_s: f64,
    tau: Vec<f64>,
    q: Vec<f64>,
    i: Vec<f64>,
}

impl Trajectory {
    pub fn from_columns(
        mode: Mode,
        omega_rad_s: f64,
        tau: Vec<f64>,
        q: Vec<f64>,
        i: Vec<f64>,
    ) -> SimResult<Self> {
        if tau.len() != q.len() || tau.len() != i.len() {
            return Err(SimError::invalid("trajectory columns differ in length"));
        }
        if tau.windows(2).any(|w| w[1] < w[0]) {
            return Err(SimError::invalid("trajectory time axis is not monotonic"));
        }
        Ok(Self {
            mode,
            omega_rad_s,
            tau,
            q,
            i,
        })
    }

    /// Columns already known to be equal-length with monotonic τ.
    pub(crate) fn from_sorted_columns(
        mode: Mode,
        omega_rad_s: f64,
        tau: Vec<f64>,
        q: Vec<f64>,
        i: Vec<f64>,
    ) -> Self {
        debug_assert!(tau.len() == q.len() && tau.len() == i.len());
        Self {
            mode,
            omega_rad_s,
            tau,
            q,
            i,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn omega_rad_s(&self) -> f64 {
        self.omega_rad_s
    }

    pub fn len(&self) -> usize {
        self.tau.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tau.is_empty()
    }

    pub fn tau(&self) -> &[f64] {
        &self.tau
    }

    pub fn q(&self) -> &[f64] {
        &self.q
    }

    pub fn i(&self) -> &[f64] {
        &self.i
    }

    /// Last τ value, 0.0 when empty.
    pub fn tau_end(&self) -> f64 {
        self.tau.last().copied().unwrap_or(0.0)
    }

    pub fn sample(&self, index: usize) -> Option<Sample> {
        Some(Sample {
            tau: *self.tau.get(index)?,
            q: self.q[index],
            i: self.i[index],
        })
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.tau
            .iter()
            .zip(&self.q)
            .zip(&self.i)
            .map(|((&tau, &q), &i)| Sample { tau, q, i })
    }

    /// Largest |q| or |i| over the whole trajectory.
    pub fn max_amplitude(&self) -> f64 {
        self.q
            .iter()
            .chain(&self.i)
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// Largest deviation of q² + i² from its initial value.
    ///
    /// In normalized units this is the stored-energy invariant of the tank.
    pub fn energy_drift(&self) -> f64 {
        let Some(first) = self.sample(0) else {
            return 0.0;
        };
        let e0 = first.q * first.q + first.i * first.i;
        self.samples()
            .map(|s| (s.q * s.q + s.i * s.i - e0).abs())
            .fold(0.0, f64::max)
    }

    /// Linear interpolation at `tau`; None outside the covered range.
    pub fn interpolate(&self, tau: f64) -> Option<Sample> {
        let first = *self.tau.first()?;
        let last = *self.tau.last()?;
        if !(first..=last).contains(&tau) {
            return None;
        }
        let hi = self.tau.partition_point(|&t| t < tau);
        if hi == 0 || self.tau[hi] == tau {
            return self.sample(hi);
        }
        let lo = hi - 1;
        let span = self.tau[hi] - self.tau[lo];
        let w = if span > 0.0 {
            (tau - self.tau[lo]) / span
        } else {
            0.0
        };
        Some(Sample {
            tau,
            q: self.q[lo] + w * (self.q[hi] - self.q[lo]),
            i: self.i[lo] + w * (self.i[hi] - self.i[lo]),
        })
    }
}
