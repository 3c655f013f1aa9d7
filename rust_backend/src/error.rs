//! Error types for KPI loading and computation.

use polars::error::PolarsError;

/// Result type for KPI operations
pub type KpiResult<T> = Result<T, KpiError>;

/// Error type for KPI operations
#[derive(Debug, thiserror::Error)]
pub enum KpiError {
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("DataFrame error: {0}")]
    DataFrame(#[from] PolarsError),
}

impl From<std::io::Error> for KpiError {
    fn from(e: std::io::Error) -> Self {
        KpiError::Io(e.to_string())
    }
}
