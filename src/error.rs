//! Error types shared by every pipeline stage.

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors raised by the forecasting pipeline
///
/// Every variant describes a deterministic data-shape or configuration
/// problem. Nothing here is retried.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Degenerate scale: min and max are both {0}")]
    DegenerateScale(f64),

    #[error("Undefined metric: {0}")]
    UndefinedMetric(String),

    #[error("Insufficient history: need at least {needed} values, got {got}")]
    InsufficientHistory { needed: usize, got: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Data error: {0}")]
    Data(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<figment::Error> for ForecastError {
    fn from(err: figment::Error) -> Self {
        ForecastError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ForecastError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ForecastError::Config(errors.to_string())
    }
}
