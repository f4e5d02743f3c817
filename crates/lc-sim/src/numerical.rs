//! Integrated LC trajectory, rescaled to normalized time.

use std::f64::consts::TAU;

use lc_core::timing::Timer;
use lc_core::{CircuitParams, Mode, defaults, ensure_finite, ensure_positive, linspace};
use nalgebra::Vector2;

use crate::error::{SimError, SimResult};
use crate::integrator::{DormandPrince45, StepTolerances};
use crate::model::LcCircuit;
use crate::trajectory::{Trajectory, TrajectoryProvider};

/// Integrates `q̇ = i, i̇ = -q/(LC)` over physical `[t_start_s, t_end_s]`
/// and reports `(τ = ω·t, q, i/ω)`.
///
/// The evaluation grid never resolves a period with fewer than
/// [`defaults::MIN_POINTS_PER_CYCLE`] points; `samples` is a floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumericalTrajectory {
    pub t_start_s: f64,
    pub t_end_s: f64,
    pub params: CircuitParams,
    pub samples: usize,
    /// Relative tolerance of the integrator
    pub rtol: f64,
    /// Absolute tolerance, as a fraction of the oscillation amplitude
    pub atol_rel: f64,
}

impl NumericalTrajectory {
    pub fn new(t_start_s: f64, t_end_s: f64, params: CircuitParams) -> Self {
        Self {
            t_start_s,
            t_end_s,
            params,
            samples: defaults::SAMPLE_COUNT,
            rtol: 1e-9,
            atol_rel: 1e-12,
        }
    }

    /// Physical interval `[0, tau_end / ω]`, i.e. `tau_end` in normalized time.
    pub fn over_tau(params: CircuitParams, tau_end: f64) -> SimResult<Self> {
        let omega = checked_omega(&params, 0.0)?;
        let tau_end = ensure_finite(tau_end, "tau_end")?;
        Ok(Self::new(0.0, tau_end / omega, params))
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_tolerances(mut self, rtol: f64, atol_rel: f64) -> Self {
        self.rtol = rtol;
        self.atol_rel = atol_rel;
        self
    }

    /// Evaluation points needed for `omega` over this interval.
    ///
    /// Fails when resolving every period would exceed
    /// [`defaults::MAX_SAMPLES`].
    pub fn evaluation_points(&self, omega: f64) -> SimResult<usize> {
        let cycles = omega * (self.t_end_s - self.t_start_s) / TAU;
        let needed = (cycles * defaults::MIN_POINTS_PER_CYCLE as f64).ceil();
        if !needed.is_finite() || needed >= defaults::MAX_SAMPLES as f64 {
            return Err(SimError::failure(
                format!(
                    "{cycles:e} cycles need more than {} evaluation points",
                    defaults::MAX_SAMPLES
                ),
                self.t_end_s,
            ));
        }
        let needed = if needed > 0.0 { needed as usize + 1 } else { 0 };
        Ok(self.samples.max(needed))
    }

    fn validate(&self) -> SimResult<()> {
        ensure_positive(self.params.inductance_h, "inductance")?;
        ensure_positive(self.params.capacitance_f, "capacitance")?;
        ensure_finite(self.params.q0_c, "initial charge")?;
        ensure_finite(self.params.i0_a, "initial current")?;
        ensure_finite(self.t_start_s, "t_start")?;
        ensure_finite(self.t_end_s, "t_end")?;
        if self.t_end_s < self.t_start_s {
            return Err(SimError::invalid("t_end must not precede t_start"));
        }
        if self.samples > defaults::MAX_SAMPLES {
            return Err(SimError::invalid(format!(
                "samples must not exceed {}, got {}",
                defaults::MAX_SAMPLES,
                self.samples
            )));
        }
        Ok(())
    }

    pub fn compute(&self) -> SimResult<Trajectory> {
        self.validate()?;
        let omega = checked_omega(&self.params, self.t_start_s)?;
        let n = self.evaluation_points(omega)?;
        let t_eval = linspace(self.t_start_s, self.t_end_s, n);

        // Charge and current live on scales a factor ω apart.
        let amplitude = self.params.q0_c.hypot(self.params.i0_a / omega);
        let amplitude = if amplitude > 0.0 { amplitude } else { 1.0 };
        let atol_q = self.atol_rel * amplitude;
        let tol = StepTolerances::with_components([atol_q, atol_q * omega], [self.rtol; 2]);

        let timer = Timer::start("numerical trajectory");
        let mut solver = DormandPrince45::new(tol);
        let states = solver.solve_at(
            &LcCircuit::new(self.params.inductance_h, self.params.capacitance_f),
            &Vector2::new(self.params.q0_c, self.params.i0_a),
            &t_eval,
        )?;
        timer.stop_and_log();

        tracing::debug!(
            points = n,
            omega_rad_s = omega,
            accepted = solver.stats.accepted_steps,
            rejected = solver.stats.rejected_steps,
            fn_evals = solver.stats.fn_evals,
            "numerical trajectory integrated"
        );

        let tau = t_eval.iter().map(|t| omega * t).collect();
        let q = states.iter().map(|y| y[0]).collect();
        let i = states.iter().map(|y| y[1] / omega).collect();
        Trajectory::from_columns(Mode::Numerical, omega, tau, q, i)
    }
}

impl TrajectoryProvider for NumericalTrajectory {
    fn mode(&self) -> Mode {
        Mode::Numerical
    }

    fn trajectory(&self) -> SimResult<Trajectory> {
        self.compute()
    }
}

/// ω for valid parameters; under/overflow of LC is an integration failure.
fn checked_omega(params: &CircuitParams, t: f64) -> SimResult<f64> {
    ensure_positive(params.inductance_h, "inductance")?;
    ensure_positive(params.capacitance_f, "capacitance")?;
    let omega = params.omega().value;
    if omega.is_finite() && omega > 0.0 {
        Ok(omega)
    } else {
        Err(SimError::IntegrationFailure {
            what: format!(
                "angular frequency not representable for L={:e} H, C={:e} F",
                params.inductance_h, params.capacitance_f
            ),
            t,
        })
    }
}
