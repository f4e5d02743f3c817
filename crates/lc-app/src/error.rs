//! Error types for the lc-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and provides a unified error interface for both CLI and GUI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Integration failed: {0}")]
    IntegrationFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for lc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<lc_core::CoreError> for AppError {
    fn from(err: lc_core::CoreError) -> Self {
        AppError::InvalidParameter(err.to_string())
    }
}

impl From<lc_sim::SimError> for AppError {
    fn from(err: lc_sim::SimError) -> Self {
        match err {
            lc_sim::SimError::InvalidParameter { .. } => AppError::InvalidParameter(err.to_string()),
            lc_sim::SimError::IntegrationFailure { .. } => {
                AppError::IntegrationFailure(err.to_string())
            }
        }
    }
}

impl From<lc_results::CacheError> for AppError {
    fn from(err: lc_results::CacheError) -> Self {
        match err {
            lc_results::CacheError::Sim(sim) => sim.into(),
            other => AppError::Cache(other.to_string()),
        }
    }
}
