//! Windowed playback over a precomputed trajectory.
//!
//! The core never sleeps: hosts ask a [`Ticker`] how many ticks are due and
//! drive the [`AnimationController`], which yields [`Frame`]s borrowed from
//! the trajectory.

pub mod controller;
pub mod playhead;
pub mod ticker;
pub mod window;

pub use controller::{AnimationController, Command};
pub use playhead::{PlaybackState, PlayheadState};
pub use ticker::{BurstOutcome, FrameSink, Ticker, run_burst};
pub use window::{Frame, WindowSelector, select_window};
