use claims_engine::{CodeSource, ExhaustionPolicy, GeneratorConfig, Variant};
use logger_redacted::LoggerConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::validation::ConfigValidator;

/// Everything the CLI and the server read from configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggerConfig,
    pub server: ServerSettings,
    pub generator: GeneratorSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Live sessions allowed at once; new sessions beyond this are refused
    pub max_sessions: usize,
    /// Rows returned with a filter response
    pub preview_rows: usize,
    pub max_upload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_sessions: 16,
            preview_rows: 20,
            max_upload_bytes: 64 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Variant used when a request names none
    pub variant: Variant,
    /// Row count used when a request gives none; the variant default otherwise
    pub rows: Option<usize>,
    /// Overrides the exhaustion policy of every pooled code column
    pub exhaustion_policy: Option<ExhaustionPolicy>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            variant: Variant::Classic,
            rows: None,
            exhaustion_policy: None,
        }
    }
}

impl GeneratorSettings {
    /// Preset config for `variant` with the configured overrides applied
    pub fn config_for(&self, variant: Variant) -> GeneratorConfig {
        let mut config = variant.config();
        if let Some(policy) = self.exhaustion_policy {
            for source in [&mut config.diagnosis_codes, &mut config.facility_ids] {
                if let CodeSource::Pool { size, .. } = *source {
                    *source = CodeSource::Pool { size, policy };
                }
            }
        }
        config
    }

    /// Requested rows, else the configured rows for the default variant,
    /// else the variant's own default
    pub fn rows_for(&self, variant: Variant, requested: Option<usize>) -> usize {
        requested
            .or(self.rows.filter(|_| variant == self.variant))
            .unwrap_or_else(|| variant.config().rows.default)
    }
}

impl ConfigValidator for Settings {
    fn validate(&self) -> Result<()> {
        if self.logging.log_level.trim().is_empty() {
            return Err(ConfigError::ValidationError("logging.log_level cannot be empty".into()));
        }
        if self.server.max_sessions == 0 {
            return Err(ConfigError::ValidationError(
                "server.max_sessions must be at least 1".into(),
            ));
        }
        if self.server.preview_rows == 0 {
            return Err(ConfigError::ValidationError(
                "server.preview_rows must be at least 1".into(),
            ));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "server.max_upload_bytes must be positive".into(),
            ));
        }
        if let Some(rows) = self.generator.rows {
            self.generator
                .variant
                .config()
                .rows
                .check(rows)
                .map_err(|e| ConfigError::ValidationError(format!("generator.rows: {e}")))?;
        }
        Ok(())
    }
}
