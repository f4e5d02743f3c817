//! ODE systems integrated by the trajectory engine.

use nalgebra::{SVector, Vector2};

/// System of ordinary differential equations dy/dt = f(t, y).
pub trait OdeSystem<const N: usize> {
    /// Evaluate the right-hand side at `(t, y)`.
    fn rhs(&self, t: f64, y: &SVector<f64, N>) -> SVector<f64, N>;
}

/// Ideal LC tank in physical time.
///
/// State is `[q, i]` (charge in C, current in A):
/// - q̇ = i
/// - i̇ = -q / (LC)
#[derive(Clone, Copy, Debug)]
pub struct LcCircuit {
    inv_lc: f64,
}

impl LcCircuit {
    pub fn new(inductance_h: f64, capacitance_f: f64) -> Self {
        Self {
            inv_lc: 1.0 / (inductance_h * capacitance_f),
        }
    }

    /// Square of the resonant angular frequency, 1/(LC).
    pub fn omega_squared(&self) -> f64 {
        self.inv_lc
    }
}

impl OdeSystem<2> for LcCircuit {
    fn rhs(&self, _t: f64, y: &Vector2<f64>) -> Vector2<f64> {
        Vector2::new(y[1], -self.inv_lc * y[0])
    }
}
