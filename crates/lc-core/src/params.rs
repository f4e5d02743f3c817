//! Circuit parameters and solution mode.

use crate::error::{CoreError, CoreResult};
use crate::numeric::{ensure_finite, ensure_positive};
use crate::units::{AngularVelocity, Capacitance, Inductance, farad, henry, resonant_omega};

/// Domain constants shared by the providers, the animation and the hosts.
pub mod defaults {
    use std::f64::consts::PI;

    /// Samples per trajectory when nothing else is requested.
    pub const SAMPLE_COUNT: usize = 20_000;
    /// Evaluation points per oscillation period the numerical provider never goes below.
    pub const MIN_POINTS_PER_CYCLE: usize = 200;
    /// Upper bound on the points of any one trajectory.
    pub const MAX_SAMPLES: usize = 2_000_000;
    /// Normalized domain length (~100 cycles).
    pub const TAU_END: f64 = 200.0 * PI;
    /// Longest accepted domain (5 000 cycles), well inside [`MAX_SAMPLES`] at
    /// [`MIN_POINTS_PER_CYCLE`].
    pub const MAX_TAU_END: f64 = 10_000.0 * PI;
    /// Visible window width (~3 cycles).
    pub const WINDOW: f64 = 6.0 * PI;
    /// Play-head advance per tick at speed factor 1.0.
    pub const BASE_INCREMENT: f64 = 0.04;
    pub const SPEED: f64 = 0.3;
    pub const SPEED_MIN: f64 = 0.05;
    pub const SPEED_MAX: f64 = 1.0;
    pub const TICK_INTERVAL_MS: u64 = 30;
    pub const MAX_TICK_INTERVAL_MS: u64 = 10_000;
    pub const BURST_TICKS: usize = 200;
    /// y-axis display hint for rendered frames.
    pub const Y_RANGE: [f64; 2] = [-1.1, 1.1];

    pub const LOG10_L: f64 = -4.0;
    pub const LOG10_C: f64 = -9.0;
    pub const LOG10_L_RANGE: [f64; 2] = [-6.0, -2.0];
    pub const LOG10_C_RANGE: [f64; 2] = [-12.0, -6.0];
}

/// How a trajectory is produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Mode {
    /// Closed-form unit oscillator `q = cos τ, i = -sin τ`.
    #[default]
    Analytical,
    /// Adaptive-step integration of the physical ODE, rescaled to τ.
    Numerical,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Analytical => "Analytical",
            Mode::Numerical => "Numerical",
        }
    }
}

/// Physical description of an ideal LC tank and its initial state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CircuitParams {
    /// Inductance (H)
    pub inductance_h: f64,
    /// Capacitance (F)
    pub capacitance_f: f64,
    /// Initial charge (C)
    pub q0_c: f64,
    /// Initial current (A)
    pub i0_a: f64,
}

impl Default for CircuitParams {
    fn default() -> Self {
        Self::from_log10(defaults::LOG10_L, defaults::LOG10_C)
    }
}

impl CircuitParams {
    /// Build from decade exponents, the way the slider UI expresses L and C.
    pub fn from_log10(log10_l: f64, log10_c: f64) -> Self {
        Self {
            inductance_h: 10f64.powf(log10_l),
            capacitance_f: 10f64.powf(log10_c),
            q0_c: 1.0,
            i0_a: 0.0,
        }
    }

    pub fn inductance(&self) -> Inductance {
        henry(self.inductance_h)
    }

    pub fn capacitance(&self) -> Capacitance {
        farad(self.capacitance_f)
    }

    /// Check L, C positive and initial conditions finite.
    pub fn validate(&self) -> CoreResult<()> {
        ensure_positive(self.inductance_h, "inductance")?;
        ensure_positive(self.capacitance_f, "capacitance")?;
        ensure_finite(self.q0_c, "initial charge")?;
        ensure_finite(self.i0_a, "initial current")?;
        Ok(())
    }

    /// Resonant angular frequency ω = 1/√(LC) in rad/s.
    ///
    /// Fails when L or C is invalid, or when the product under/overflows so
    /// that ω is not a finite positive number.
    pub fn omega_rad_s(&self) -> CoreResult<f64> {
        self.validate()?;
        let omega = self.omega().value;
        if !omega.is_finite() || omega <= 0.0 {
            return Err(CoreError::NonFinite {
                what: "angular frequency",
                value: omega,
            });
        }
        Ok(omega)
    }

    pub fn omega(&self) -> AngularVelocity {
        resonant_omega(self.inductance(), self.capacitance())
    }

    /// Oscillation period 2π√(LC) in seconds.
    pub fn period_s(&self) -> CoreResult<f64> {
        Ok(std::f64::consts::TAU / self.omega_rad_s()?)
    }
}
