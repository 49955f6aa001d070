use thiserror::Error;

use crate::codes;
use crate::reporting::Reportable;

/// Application-level error used at binary edges
///
/// Library crates keep their own `thiserror` enums; the CLI and the HTTP
/// server funnel those into `AppError` once they leave the core.
#[derive(Error, Debug)]
pub enum AppError {
    /// Settings could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Logging, listener binding and other startup failures
    #[error("Startup error: {0}")]
    StartupError(String),

    /// A core operation failed; carries the originating code
    #[error("{message}")]
    Operation { code: &'static str, message: String },

    /// File system errors while reading input or writing output
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Wrap any reportable error, keeping its code and message
    pub fn from_reportable<E: Reportable>(error: &E) -> Self {
        Self::Operation {
            code: error.code(),
            message: error.user_message(),
        }
    }
}

impl Reportable for AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::ConfigError(_) => codes::generation::INVALID_CONFIGURATION,
            AppError::StartupError(_) | AppError::Other(_) => codes::system::INTERNAL,
            AppError::Operation { code, .. } => *code,
            AppError::IoError(_) => codes::system::IO,
        }
    }
}

/// Result type alias for application entry points
pub type Result<T> = std::result::Result<T, AppError>;
