//! Cache key types.

use lc_core::{CircuitParams, Mode, defaults, ensure_finite};
use lc_sim::{AnalyticalTrajectory, NumericalTrajectory, SimError, SimResult, Trajectory};
use serde::{Deserialize, Serialize};

pub type TrajectoryId = String;

/// Everything that determines a trajectory's samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TrajectoryKey {
    Analytical {
        tau_end: f64,
        samples: usize,
    },
    Numerical {
        t_start_s: f64,
        t_end_s: f64,
        circuit: CircuitParams,
        samples: usize,
    },
}

impl TrajectoryKey {
    pub fn analytical(tau_end: f64, samples: usize) -> Self {
        TrajectoryKey::Analytical { tau_end, samples }
    }

    pub fn numerical(provider: &NumericalTrajectory) -> Self {
        TrajectoryKey::Numerical {
            t_start_s: provider.t_start_s,
            t_end_s: provider.t_end_s,
            circuit: provider.params,
            samples: provider.samples,
        }
    }

    /// Key for a host request expressed in normalized time.
    ///
    /// The analytical mode ignores the circuit; the numerical one converts
    /// `tau_end` into a physical interval and so validates the circuit.
    pub fn for_request(
        mode: Mode,
        circuit: &CircuitParams,
        tau_end: f64,
        samples: usize,
    ) -> SimResult<Self> {
        let key = match mode {
            Mode::Analytical => Self::analytical(tau_end, samples),
            Mode::Numerical => {
                let provider = NumericalTrajectory::over_tau(*circuit, tau_end)?.with_samples(samples);
                Self::numerical(&provider)
            }
        };
        key.validate()?;
        Ok(key)
    }

    /// Reject keys that cannot be hashed faithfully or sampled within budget.
    ///
    /// Every non-finite float serializes to `null`, so NaN and ±∞ would
    /// otherwise share one id.
    pub fn validate(&self) -> SimResult<()> {
        let samples = match *self {
            TrajectoryKey::Analytical { tau_end, samples } => {
                ensure_finite(tau_end, "tau_end")?;
                samples
            }
            TrajectoryKey::Numerical {
                t_start_s,
                t_end_s,
                circuit,
                samples,
            } => {
                ensure_finite(t_start_s, "t_start")?;
                ensure_finite(t_end_s, "t_end")?;
                circuit.validate()?;
                samples
            }
        };
        if samples > defaults::MAX_SAMPLES {
            return Err(SimError::InvalidParameter {
                what: format!(
                    "samples must not exceed {}, got {samples}",
                    defaults::MAX_SAMPLES
                ),
            });
        }
        Ok(())
    }

    pub fn mode(&self) -> Mode {
        match self {
            TrajectoryKey::Analytical { .. } => Mode::Analytical,
            TrajectoryKey::Numerical { .. } => Mode::Numerical,
        }
    }

    /// Run the provider this key describes.
    pub fn compute(&self) -> SimResult<Trajectory> {
        match *self {
            TrajectoryKey::Analytical { tau_end, samples } => {
                Ok(AnalyticalTrajectory::new(tau_end, samples).generate())
            }
            TrajectoryKey::Numerical {
                t_start_s,
                t_end_s,
                circuit,
                samples,
            } => NumericalTrajectory::new(t_start_s, t_end_s, circuit)
                .with_samples(samples)
                .compute(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analytical_request_ignores_circuit() {
        let bad = CircuitParams {
            inductance_h: -1.0,
            ..CircuitParams::default()
        };
        let key = TrajectoryKey::for_request(Mode::Analytical, &bad, 10.0, 100).unwrap();
        assert_eq!(key, TrajectoryKey::analytical(10.0, 100));
        assert_eq!(key.mode(), Mode::Analytical);
    }

    #[test]
    fn numerical_request_converts_tau_end() {
        let circuit = CircuitParams::default();
        let key = TrajectoryKey::for_request(Mode::Numerical, &circuit, 10.0, 100).unwrap();
        let TrajectoryKey::Numerical { t_end_s, .. } = key else {
            panic!("expected numerical key");
        };
        let omega = circuit.omega_rad_s().unwrap();
        assert!((t_end_s * omega - 10.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_domains_are_rejected() {
        let circuit = CircuitParams::default();
        for tau_end in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            for mode in [Mode::Analytical, Mode::Numerical] {
                let err = TrajectoryKey::for_request(mode, &circuit, tau_end, 100).unwrap_err();
                assert!(matches!(err, SimError::InvalidParameter { .. }), "{mode:?} {tau_end}");
            }
        }
        assert!(TrajectoryKey::analytical(f64::NAN, 100).validate().is_err());
    }

    #[test]
    fn sample_count_is_bounded() {
        let circuit = CircuitParams::default();
        let over = defaults::MAX_SAMPLES + 1;
        assert!(TrajectoryKey::for_request(Mode::Analytical, &circuit, 10.0, over).is_err());
        assert!(TrajectoryKey::for_request(Mode::Numerical, &circuit, 10.0, over).is_err());
        assert!(
            TrajectoryKey::for_request(Mode::Analytical, &circuit, 10.0, defaults::MAX_SAMPLES)
                .is_ok()
        );
    }

    #[test]
    fn serialized_form_is_tagged() {
        let json = serde_json::to_string(&TrajectoryKey::analytical(1.0, 2)).unwrap();
        assert!(json.contains("\"mode\":\"analytical\""));
    }
}
