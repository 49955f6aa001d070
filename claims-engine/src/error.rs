use error_common::{codes, Reportable};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimsError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Row count {requested} is outside the allowed range {min}..={max}")]
    RowCountOutOfBounds {
        requested: usize,
        min: usize,
        max: usize,
    },

    #[error("Unknown variant '{0}'")]
    UnknownVariant(String),

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Column '{column}' expects {expected}, got '{value}'")]
    TypeCoercion {
        column: String,
        expected: &'static str,
        value: String,
    },

    #[error("Unsupported upload format '{0}', expected .csv or .json")]
    UnsupportedFormat(String),

    #[error("Requested {requested} unique codes but only {available} exist")]
    CatalogExhaustion { requested: usize, available: u64 },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClaimsError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn type_coercion(column: impl Into<String>, expected: &'static str, value: impl Into<String>) -> Self {
        Self::TypeCoercion {
            column: column.into(),
            expected,
            value: value.into(),
        }
    }
}

impl Reportable for ClaimsError {
    fn code(&self) -> &'static str {
        match self {
            ClaimsError::Configuration(_) => codes::generation::INVALID_CONFIGURATION,
            ClaimsError::RowCountOutOfBounds { .. } => codes::generation::ROW_COUNT_OUT_OF_BOUNDS,
            ClaimsError::UnknownVariant(_) => codes::generation::UNKNOWN_VARIANT,
            ClaimsError::UnknownColumn(_) => codes::filter::UNKNOWN_COLUMN,
            ClaimsError::TypeCoercion { .. } => codes::filter::TYPE_COERCION,
            ClaimsError::UnsupportedFormat(_) => codes::ingest::UNSUPPORTED_FORMAT,
            ClaimsError::MalformedInput(_) | ClaimsError::Csv(_) | ClaimsError::Json(_) => {
                codes::ingest::MALFORMED_INPUT
            }
            ClaimsError::CatalogExhaustion { .. } => codes::catalog::EXHAUSTED,
            ClaimsError::Io(_) => codes::system::IO,
        }
    }
}

pub type ClaimsResult<T> = Result<T, ClaimsError>;
