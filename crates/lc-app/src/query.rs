//! Query helpers for trajectories and frames.

use std::f64::consts::TAU;
use std::io::Write;

use lc_anim::Frame;
use lc_core::Mode;
use lc_sim::{Sample, Trajectory};

use crate::error::{AppError, AppResult};

/// Summary of a trajectory's domain and quality.
#[derive(Debug, Clone)]
pub struct TrajectorySummary {
    pub mode: Mode,
    pub omega_rad_s: f64,
    /// Physical period; only meaningful for the integrated mode.
    pub period_s: Option<f64>,
    pub sample_count: usize,
    pub tau_range: (f64, f64),
    pub max_amplitude: f64,
    pub energy_drift: f64,
}

pub fn get_trajectory_summary(trajectory: &Trajectory) -> AppResult<TrajectorySummary> {
    if trajectory.is_empty() {
        return Err(AppError::InvalidInput("Trajectory has no samples".to_string()));
    }
    let tau = trajectory.tau();
    let period_s = match trajectory.mode() {
        Mode::Numerical => Some(TAU / trajectory.omega_rad_s()),
        Mode::Analytical => None,
    };
    Ok(TrajectorySummary {
        mode: trajectory.mode(),
        omega_rad_s: trajectory.omega_rad_s(),
        period_s,
        sample_count: trajectory.len(),
        tau_range: (tau[0], tau[tau.len() - 1]),
        max_amplitude: trajectory.max_amplitude(),
        energy_drift: trajectory.energy_drift(),
    })
}

/// Column units for CSV export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CsvUnits {
    /// `tau,q,i` with i = dq/dτ
    #[default]
    Normalized,
    /// `t_s,q_c,i_a` using the trajectory's ω
    Physical,
}

fn write_samples(
    out: &mut impl Write,
    samples: impl Iterator<Item = Sample>,
    omega: f64,
    units: CsvUnits,
) -> AppResult<usize> {
    let mut rows = 0;
    match units {
        CsvUnits::Normalized => {
            writeln!(out, "tau,q,i")?;
            for s in samples {
                writeln!(out, "{},{},{}", s.tau, s.q, s.i)?;
                rows += 1;
            }
        }
        CsvUnits::Physical => {
            writeln!(out, "t_s,q_c,i_a")?;
            for s in samples {
                writeln!(out, "{},{},{}", s.tau / omega, s.q, s.i * omega)?;
                rows += 1;
            }
        }
    }
    Ok(rows)
}

/// Write every sample; returns the number of data rows.
pub fn export_trajectory_csv(
    trajectory: &Trajectory,
    out: &mut impl Write,
    units: CsvUnits,
) -> AppResult<usize> {
    write_samples(out, trajectory.samples(), trajectory.omega_rad_s(), units)
}

/// Write the samples of one window.
pub fn export_frame_csv(
    frame: &Frame<'_>,
    omega_rad_s: f64,
    out: &mut impl Write,
    units: CsvUnits,
) -> AppResult<usize> {
    write_samples(out, frame.samples(), omega_rad_s, units)
}
