//! Error types for the claims CLI.

use claims_engine::ClaimsError;
use config_engine::ConfigError;
use error_common::{codes, Reportable};
use logger_redacted::LoggerError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Claims(#[from] ClaimsError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging setup failed: {0}")]
    Logger(#[from] LoggerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `--dimensions-dir` given for a variant that builds no dimensions
    #[error("Variant '{0}' does not produce dimension tables")]
    NoDimensions(String),
}

impl Reportable for CliError {
    fn code(&self) -> &'static str {
        match self {
            CliError::Claims(e) => e.code(),
            CliError::Config(_) | CliError::NoDimensions(_) => codes::generation::INVALID_CONFIGURATION,
            CliError::Logger(_) => codes::system::INTERNAL,
            CliError::Io(_) => codes::system::IO,
        }
    }
}
