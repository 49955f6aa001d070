use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use claims_engine::ClaimsError;
use error_common::{codes, report_error, Reportable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Unique error ID, also present in the matching log line
    pub error_id: String,
    /// Error category, e.g. `configuration_error`
    pub error_type: String,
    /// Stable code from `error_common::codes`
    pub code: String,
    /// Human-readable error message
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Standard API success response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Rows matched before any preview limit was applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    /// Errors raised by the claims core
    #[error(transparent)]
    Claims(#[from] ClaimsError),

    #[error("Resource not found: {resource_type}")]
    NotFound { resource_type: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// The live-session cap is reached
    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn not_found(resource_type: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Claims(claims) => match claims {
                ClaimsError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ClaimsError::CatalogExhaustion { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ClaimsError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ClaimsError::Configuration(_)
                | ClaimsError::RowCountOutOfBounds { .. }
                | ClaimsError::UnknownVariant(_)
                | ClaimsError::UnknownColumn(_)
                | ClaimsError::TypeCoercion { .. }
                | ClaimsError::MalformedInput(_)
                | ClaimsError::Csv(_)
                | ClaimsError::Json(_) => StatusCode::BAD_REQUEST,
            },
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Claims(claims) => match claims {
                ClaimsError::Configuration(_)
                | ClaimsError::RowCountOutOfBounds { .. }
                | ClaimsError::UnknownVariant(_)
                | ClaimsError::UnknownColumn(_) => "configuration_error",
                ClaimsError::TypeCoercion { .. } => "type_coercion_error",
                ClaimsError::UnsupportedFormat(_) => "unsupported_format",
                ClaimsError::MalformedInput(_) | ClaimsError::Csv(_) | ClaimsError::Json(_) => "malformed_input",
                ClaimsError::CatalogExhaustion { .. } => "catalog_exhaustion",
                ClaimsError::Io(_) => "io_error",
            },
            ApiError::NotFound { .. } => "not_found",
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::ServiceUnavailable { .. } => "service_unavailable",
            ApiError::Internal { .. } => "internal_error",
        }
    }
}

impl Reportable for ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Claims(claims) => claims.code(),
            ApiError::NotFound { .. } => codes::session::NOT_FOUND,
            ApiError::BadRequest { .. } => codes::generation::INVALID_CONFIGURATION,
            ApiError::ServiceUnavailable { .. } => codes::session::CAPACITY_REACHED,
            ApiError::Internal { .. } => codes::system::INTERNAL,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let report = report_error(self.error_type(), &self);

        let body = ApiErrorResponse {
            error_id: report.error_id,
            error_type: self.error_type().to_string(),
            code: report.code,
            message: report.message,
            timestamp: report.timestamp,
        };

        (status_code, Json(body)).into_response()
    }
}

/// Convenience function for creating successful API responses
pub fn api_success<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
        metadata: None,
    })
}

/// Successful response carrying the unlimited match count
pub fn api_success_with_count<T: Serialize>(data: T, total_count: usize) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
        metadata: Some(ResponseMetadata {
            total_count: Some(total_count),
        }),
    })
}

pub type ApiResult<T> = Result<T, ApiError>;
