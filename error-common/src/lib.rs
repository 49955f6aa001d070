//! Common error handling utilities for the claims simulator
//!
//! This crate provides the pieces every other crate shares when an error
//! has to reach a person: stable error codes, a [`Reportable`] trait that
//! pairs an error with its code, and [`report_error`] which logs the error
//! once and returns a serializable [`ErrorReport`].
//!
//! # Error Categories
//!
//! - **generation**: invalid generator configuration or row counts
//! - **filter**: identifier coercion failures and unknown columns
//! - **ingest**: unsupported or malformed uploads
//! - **catalog**: unique code pools that cannot be satisfied
//! - **session**: unknown sessions and capacity limits
//!
//! # Example
//!
//! ```rust
//! use error_common::{report_error, AppError};
//!
//! let error = AppError::ConfigError("row count must be at least 1000".to_string());
//! let report = report_error("generate", &error);
//! assert_eq!(report.code, "GEN_1001");
//! ```

pub mod codes;
pub mod reporting;
pub mod types;

pub use reporting::*;
pub use types::*;
