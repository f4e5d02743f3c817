//! lc-core: shared foundation for the LC oscillation simulator.
//!
//! Contains:
//! - units (uom SI types + constructors for the circuit quantities)
//! - numeric (finiteness checks + evenly spaced grids)
//! - params (circuit parameters, solution mode, domain constants)
//! - timing (opt-in wall-clock timers reported through tracing)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod params;
pub mod timing;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use params::{CircuitParams, Mode, defaults};
pub use units::*;
