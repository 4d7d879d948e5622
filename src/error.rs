//! Error types for cbr_usdrub

use thiserror::Error;

/// Main error type for cbr_usdrub
#[derive(Error, Debug)]
pub enum CbrError {
    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("No rate records to export: {0}")]
    EmptyDataError(String),

    #[error("Write error: {path}: {reason}")]
    WriteError { path: String, reason: String },

    #[error("Read error: {path}: {reason}")]
    ReadError { path: String, reason: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CbrError {
    /// Process exit code for this error kind
    pub fn exit_code(&self) -> i32 {
        match self {
            CbrError::ConfigError(_) => 1,
            CbrError::FetchError(_) => 2,
            CbrError::ParseError(_) => 3,
            CbrError::EmptyDataError(_) => 4,
            CbrError::WriteError { .. } => 5,
            CbrError::InvalidDate(_) => 6,
            CbrError::ReadError { .. } => 7,
        }
    }

    pub(crate) fn write(path: impl AsRef<std::path::Path>, reason: impl ToString) -> Self {
        CbrError::WriteError {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for cbr_usdrub operations
pub type Result<T> = std::result::Result<T, CbrError>;
