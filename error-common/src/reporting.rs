// Error reporting utilities
// Every error that reaches a user is logged once here and turned into an
// `ErrorReport`, the shape both the CLI and the HTTP API print.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can be surfaced to a user with a stable code
pub trait Reportable: std::error::Error {
    /// Stable code from [`crate::codes`]
    fn code(&self) -> &'static str;

    /// Human-readable message shown to the user
    fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Serializable error summary handed to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Unique id for correlating the report with log lines
    pub error_id: String,
    pub code: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Log an error at the boundary nearest the user action and build its report
pub fn report_error<E: Reportable + ?Sized>(context: &str, error: &E) -> ErrorReport {
    let report = ErrorReport {
        error_id: Uuid::new_v4().to_string(),
        code: error.code().to_string(),
        message: error.user_message(),
        timestamp: Utc::now(),
    };

    tracing::error!(
        context = context,
        error_id = %report.error_id,
        error_code = %report.code,
        error = %error,
        "Operation failed"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppError;

    #[test]
    fn test_report_carries_code_and_message() {
        let error = AppError::ConfigError("rows must be positive".to_string());
        let report = report_error("test", &error);

        assert_eq!(report.code, "GEN_1001");
        assert_eq!(report.message, "Configuration error: rows must be positive");
        assert!(!report.error_id.is_empty());
    }

    #[test]
    fn test_report_display_includes_code() {
        let error = AppError::Operation {
            code: crate::codes::filter::TYPE_COERCION,
            message: "Provider ID expects an integer, got 'abc'".to_string(),
        };
        let report = report_error("test", &error);

        assert_eq!(
            report.to_string(),
            "[FILTER_2001] Provider ID expects an integer, got 'abc'"
        );
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = report_error("test", &AppError::StartupError("port in use".to_string()));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["code"], "SYS_9999");
        assert!(json["timestamp"].is_string());
    }
}
