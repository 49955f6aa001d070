//! Logging setup with automatic PII redaction for the claims simulator
//!
//! Generated datasets are synthetic, but uploaded files and filter inputs
//! are not guaranteed to be. Anything a user types or uploads goes through
//! [`PiiRedactor`] before it lands in a log line.
//!
//! # Detected Data Types
//!
//! - **Identifiers**: 10-digit patient/provider/payor ids → `******4567`
//! - **Email Addresses**: user@example.com → `u***@e***`
//! - **Phone Numbers**: (555) 123-4567 → `(***) ***-****`
//! - **SSN**: 123-45-6789 → `***-**-****`
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init, LoggerConfig, PiiRedactor};
//!
//! let config = LoggerConfig::default();
//! init(&config).expect("logging initialised once");
//!
//! let redactor = PiiRedactor::from_logger_config(&config);
//! tracing::info!(provider_id = %redactor.redact("0000012345"), "Filtering claims");
//! ```

pub mod config;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `config.log_level` when set. Logs go to stderr so
/// CSV written to stdout stays clean.
///
/// # Errors
///
/// Returns [`LoggerError::InvalidFilter`] for an unparsable level and
/// [`LoggerError::AlreadyInitialized`] when a subscriber is already set.
pub fn init(config: &LoggerConfig) -> Result<(), LoggerError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| LoggerError::InvalidFilter {
            directive: config.log_level.clone(),
            reason: e.to_string(),
        })?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .try_init(),
    };

    result.map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))
}
