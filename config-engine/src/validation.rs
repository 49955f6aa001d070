use crate::error::Result;

/// Cross-field checks that serde alone cannot express
pub trait ConfigValidator {
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`](crate::ConfigError::ValidationError)
    /// describing the first invalid setting.
    fn validate(&self) -> Result<()>;
}
