//! Sliding window selection over the τ column.

use lc_core::defaults;
use lc_sim::{Sample, Trajectory};

/// Visible slice of a trajectory ending at a cut.
///
/// `tau_min`/`tau_max` are the requested bounds, so near τ = 0 the slices
/// cover less than the full width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame<'a> {
    pub tau_min: f64,
    pub tau_max: f64,
    pub tau: &'a [f64],
    pub q: &'a [f64],
    pub i: &'a [f64],
    pub y_range: [f64; 2],
}

impl<'a> Frame<'a> {
    pub fn len(&self) -> usize {
        self.tau.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tau.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample> + 'a {
        let (tau, q, i) = (self.tau, self.q, self.i);
        tau.iter()
            .zip(q)
            .zip(i)
            .map(|((&tau, &q), &i)| Sample { tau, q, i })
    }

    /// `[τ, q]` pairs for plotting.
    pub fn charge_points(&self) -> Vec<[f64; 2]> {
        self.tau.iter().zip(self.q).map(|(&t, &q)| [t, q]).collect()
    }

    /// `[τ, i]` pairs for plotting.
    pub fn current_points(&self) -> Vec<[f64; 2]> {
        self.tau.iter().zip(self.i).map(|(&t, &i)| [t, i]).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowSelector {
    pub window: f64,
    pub y_range: [f64; 2],
}

impl Default for WindowSelector {
    fn default() -> Self {
        Self {
            window: defaults::WINDOW,
            y_range: defaults::Y_RANGE,
        }
    }
}

impl WindowSelector {
    pub fn new(window: f64) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    pub fn select<'a>(&self, trajectory: &'a Trajectory, cut: f64) -> Frame<'a> {
        let mut frame = select_window(
            trajectory.tau(),
            trajectory.q(),
            trajectory.i(),
            cut,
            self.window,
        );
        frame.y_range = self.y_range;
        frame
    }
}

/// Samples with `τ ∈ [cut - window, cut]`, located by binary search.
///
/// `tau` must be non-decreasing and the three columns equally long. A
/// negative or NaN window selects nothing.
pub fn select_window<'a>(
    tau: &'a [f64],
    q: &'a [f64],
    i: &'a [f64],
    cut: f64,
    window: f64,
) -> Frame<'a> {
    let tau_min = cut - window;
    let lo = tau.partition_point(|&t| t < tau_min);
    let hi = tau.partition_point(|&t| t <= cut).max(lo);
    Frame {
        tau_min,
        tau_max: cut,
        tau: &tau[lo..hi],
        q: &q[lo..hi],
        i: &i[lo..hi],
        y_range: defaults::Y_RANGE,
    }
}
