//! Error types for trajectory computation.

use thiserror::Error;

/// Errors encountered while producing a trajectory.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: String },

    #[error("Integration failed at t={t:e}: {what}")]
    IntegrationFailure { what: String, t: f64 },
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        SimError::InvalidParameter { what: what.into() }
    }

    pub(crate) fn failure(what: impl Into<String>, t: f64) -> Self {
        SimError::IntegrationFailure {
            what: what.into(),
            t,
        }
    }

    /// True for failures the host can recover from by choosing other parameters.
    pub fn is_integration_failure(&self) -> bool {
        matches!(self, SimError::IntegrationFailure { .. })
    }
}

impl From<lc_core::CoreError> for SimError {
    fn from(e: lc_core::CoreError) -> Self {
        SimError::InvalidParameter {
            what: e.to_string(),
        }
    }
}
