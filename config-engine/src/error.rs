use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Unsupported configuration file '{}', expected .yaml, .yml or .toml", .0.display())]
    UnsupportedSource(PathBuf),

    #[error("Configuration parsing failed: {0}")]
    ParseError(Box<figment::Error>),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError(Box::new(error))
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
