//! Adaptive Dormand-Prince 5(4) integrator.
//!
//! Embedded pair: the 5th-order solution is propagated, the difference to
//! the 4th-order companion drives the step-size controller.

use nalgebra::SVector;

use crate::error::{SimError, SimResult};
use crate::model::OdeSystem;

// Butcher tableau (Dormand & Prince, 1980).
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order weights (also the 7th stage row, FSAL).
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// b - b̂ (5th minus 4th order weights).
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

/// Rhs evaluations per attempted step (k1 is reused from the previous step).
const STAGES_PER_STEP: u64 = 6;

/// Step-size controller using an I-controller
///
/// h_new = safety * h * error^(-1/5)
#[derive(Clone, Debug)]
pub struct StepController {
    /// Safety factor (0.8-0.9 typical)
    pub safety: f64,
    /// Maximum growth factor per step
    pub max_factor: f64,
    /// Minimum reduction factor per step
    pub min_factor: f64,
    exponent: f64,
}

impl Default for StepController {
    fn default() -> Self {
        Self {
            safety: 0.9,
            max_factor: 5.0,
            min_factor: 0.2,
            exponent: 1.0 / 5.0,
        }
    }
}

impl StepController {
    /// Step size adjustment factor for a normalized error estimate.
    pub fn compute_factor(&self, error: f64) -> f64 {
        if error == 0.0 {
            return self.max_factor;
        }
        let factor = self.safety * error.powf(-self.exponent);
        factor.clamp(self.min_factor, self.max_factor)
    }
}

/// Per-component tolerances for error control
///
/// Error is measured per component as
/// `|y5 - y4| / (atol + rtol * max(|y|, |y_new|))`.
#[derive(Clone, Copy, Debug)]
pub struct StepTolerances<const N: usize> {
    /// Absolute tolerance per component
    pub atol: [f64; N],
    /// Relative tolerance per component
    pub rtol: [f64; N],
}

impl<const N: usize> Default for StepTolerances<N> {
    fn default() -> Self {
        Self::new(1e-12, 1e-9)
    }
}

impl<const N: usize> StepTolerances<N> {
    /// Uniform tolerances for every component.
    pub fn new(atol: f64, rtol: f64) -> Self {
        Self {
            atol: [atol; N],
            rtol: [rtol; N],
        }
    }

    pub fn with_components(atol: [f64; N], rtol: [f64; N]) -> Self {
        Self { atol, rtol }
    }
}

/// Counters for diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    pub fn_evals: u64,
    pub accepted_steps: u64,
    pub rejected_steps: u64,
}

#[derive(Clone, Debug)]
pub struct DormandPrince45<const N: usize> {
    tol: StepTolerances<N>,
    controller: StepController,
    /// Smallest step, relative to the integration span, before giving up.
    pub h_min_rel: f64,
    /// Attempted-step budget per `solve_at` call.
    pub max_steps: u64,
    pub stats: StepStats,
}

struct Attempt<const N: usize> {
    y: SVector<f64, N>,
    k_last: SVector<f64, N>,
    error: f64,
}

impl<const N: usize> DormandPrince45<N> {
    pub fn new(tol: StepTolerances<N>) -> Self {
        Self {
            tol,
            controller: StepController::default(),
            h_min_rel: 1e-13,
            max_steps: 50_000_000,
            stats: StepStats::default(),
        }
    }

    pub fn tolerances(&self) -> &StepTolerances<N> {
        &self.tol
    }

    /// One trial step of size `h` from `(t, y)` given `k1 = f(t, y)`.
    fn attempt<S: OdeSystem<N>>(
        &mut self,
        sys: &S,
        t: f64,
        y: &SVector<f64, N>,
        k1: &SVector<f64, N>,
        h: f64,
    ) -> Attempt<N> {
        let k2 = sys.rhs(t + C2 * h, &(y + k1 * (h * A21)));
        let k3 = sys.rhs(t + C3 * h, &(y + (k1 * A31 + k2 * A32) * h));
        let k4 = sys.rhs(t + C4 * h, &(y + (k1 * A41 + k2 * A42 + k3 * A43) * h));
        let k5 = sys.rhs(
            t + C5 * h,
            &(y + (k1 * A51 + k2 * A52 + k3 * A53 + k4 * A54) * h),
        );
        let k6 = sys.rhs(
            t + h,
            &(y + (k1 * A61 + k2 * A62 + k3 * A63 + k4 * A64 + k5 * A65) * h),
        );
        let y_new = y + (k1 * B1 + k3 * B3 + k4 * B4 + k5 * B5 + k6 * B6) * h;
        let k7 = sys.rhs(t + h, &y_new);
        self.stats.fn_evals += STAGES_PER_STEP;

        let err = (k1 * E1 + k3 * E3 + k4 * E4 + k5 * E5 + k6 * E6 + k7 * E7) * h;
        let mut error: f64 = 0.0;
        for n in 0..N {
            let scale = self.tol.atol[n] + self.tol.rtol[n] * y[n].abs().max(y_new[n].abs());
            error = error.max(err[n].abs() / scale);
        }

        Attempt {
            y: y_new,
            k_last: k7,
            error,
        }
    }

    /// Integrate from `y0` at `t_eval[0]` and return the state at every
    /// point of `t_eval`.
    ///
    /// Steps are clamped so every evaluation point is hit exactly; the
    /// adaptive step size carries over between points. `t_eval` must be
    /// finite and non-decreasing.
    pub fn solve_at<S: OdeSystem<N>>(
        &mut self,
        sys: &S,
        y0: &SVector<f64, N>,
        t_eval: &[f64],
    ) -> SimResult<Vec<SVector<f64, N>>> {
        let Some((&t0, rest)) = t_eval.split_first() else {
            return Ok(Vec::new());
        };
        if t_eval.iter().any(|t| !t.is_finite()) {
            return Err(SimError::invalid("evaluation times must be finite"));
        }
        if t_eval.windows(2).any(|w| w[1] < w[0]) {
            return Err(SimError::invalid("evaluation times must be non-decreasing"));
        }
        if y0.iter().any(|v| !v.is_finite()) {
            return Err(SimError::invalid("initial state must be finite"));
        }

        let span = t_eval[t_eval.len() - 1] - t0;
        let h_min = self.h_min_rel * span.abs().max(f64::MIN_POSITIVE);

        let mut out = Vec::with_capacity(t_eval.len());
        out.push(*y0);

        let mut t = t0;
        let mut y = *y0;
        let mut k1 = sys.rhs(t, &y);
        self.stats.fn_evals += 1;
        let mut h = rest
            .iter()
            .map(|t1| t1 - t0)
            .find(|gap| *gap > 0.0)
            .unwrap_or(span);
        let mut attempts = 0u64;

        for &target in rest {
            while t < target {
                let remaining = target - t;
                let last = h >= remaining;
                let h_try = if last { remaining } else { h };

                let step = self.attempt(sys, t, &y, &k1, h_try);
                attempts += 1;
                if attempts > self.max_steps {
                    return Err(SimError::failure("step budget exhausted", t));
                }

                let factor = self.controller.compute_factor(step.error);
                if step.error <= 1.0 {
                    if step.y.iter().any(|v| !v.is_finite()) {
                        return Err(SimError::failure("non-finite state", t + h_try));
                    }
                    self.stats.accepted_steps += 1;
                    t = if last { target } else { t + h_try };
                    y = step.y;
                    k1 = step.k_last;
                    // A step shortened to land on `target` says nothing about
                    // the achievable size, so never let it shrink `h`.
                    h = if last { h.max(h_try * factor) } else { h_try * factor };
                } else {
                    self.stats.rejected_steps += 1;
                    h = h_try * factor;
                    if !step.error.is_finite() || h < h_min {
                        return Err(SimError::failure("step size underflow", t));
                    }
                }
            }
            out.push(y);
        }

        Ok(out)
    }
}
