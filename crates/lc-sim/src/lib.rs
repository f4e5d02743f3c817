//! Trajectory engine for the ideal LC oscillator.
//!
//! Provides:
//! - `OdeSystem` trait and the LC circuit right-hand side
//! - Adaptive Dormand-Prince 5(4) integrator with dense evaluation grid
//! - Closed-form (`AnalyticalTrajectory`) and integrated
//!   (`NumericalTrajectory`) providers with one output shape
//! - `Trajectory`: immutable (τ, q, i) columns over normalized time

pub mod analytical;
pub mod error;
pub mod integrator;
pub mod model;
pub mod numerical;
pub mod trajectory;

pub use analytical::AnalyticalTrajectory;
pub use error::{SimError, SimResult};
pub use integrator::{DormandPrince45, StepController, StepStats, StepTolerances};
pub use model::{LcCircuit, OdeSystem};
pub use numerical::NumericalTrajectory;
pub use trajectory::{Sample, Trajectory, TrajectoryProvider};
