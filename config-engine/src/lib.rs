//! Layered configuration for the claims simulator
//!
//! Settings are resolved in order, each layer overriding the previous:
//!
//! 1. Built-in defaults ([`Settings::default`])
//! 2. A YAML or TOML file (`--config`, or `claimsim.yaml` when present)
//! 3. `CLAIMSIM_*` environment variables, `__` separating nested keys
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::{ConfigEngine, ConfigSource, Settings};
//!
//! // CLAIMSIM_SERVER__PORT=9000 overrides server.port from the file
//! let settings: Settings = ConfigEngine::new()
//!     .add_source(ConfigSource::file("claimsim.toml"))
//!     .add_source(ConfigSource::env())
//!     .load()?;
//! # Ok::<(), config_engine::ConfigError>(())
//! ```

pub mod error;
pub mod providers;
pub mod settings;
pub mod validation;

pub use error::*;
pub use providers::*;
pub use settings::*;
pub use validation::*;

use std::path::Path;

use figment::providers::Serialized;
use figment::Figment;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// File picked up from the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "claimsim.yaml";

#[derive(Debug, Clone, Default)]
pub struct ConfigEngine {
    sources: Vec<ConfigSource>,
}

impl ConfigEngine {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Merge every source over `T::default()`, extract, and validate
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required file is missing, a layer
    /// fails to parse, or validation rejects the result.
    pub fn load<T>(&self) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Default + ConfigValidator,
    {
        let mut figment = Figment::from(Serialized::defaults(T::default()));
        for source in &self.sources {
            figment = source.merge_into(figment)?;
        }

        let value: T = figment.extract()?;
        value.validate()?;
        tracing::debug!(sources = self.sources.len(), "Configuration loaded");
        Ok(value)
    }
}

/// Standard settings stack: defaults, then the file, then the environment
///
/// # Errors
///
/// See [`ConfigEngine::load`].
pub fn load_settings(config_file: Option<&Path>) -> Result<Settings> {
    let file = match config_file {
        Some(path) => ConfigSource::file(path),
        None => ConfigSource::optional_file(DEFAULT_CONFIG_FILE),
    };

    ConfigEngine::new()
        .add_source(file)
        .add_source(ConfigSource::env())
        .load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims_engine::{ExhaustionPolicy, Variant};
    use figment::Jail;
    use logger_redacted::LogFormat;

    #[test]
    fn test_defaults_without_sources() {
        Jail::expect_with(|_jail| {
            let settings = load_settings(None).map_err(|e| e.to_string())?;
            assert_eq!(settings.server.port, 8080);
            assert_eq!(settings.server.max_sessions, 16);
            assert_eq!(settings.generator.variant, Variant::Classic);
            assert_eq!(settings.logging.format, LogFormat::Pretty);
            Ok(())
        });
    }

    #[test]
    fn test_yaml_file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "claimsim.yaml",
                r"
server:
  port: 9000
  max_sessions: 4
generator:
  variant: dimensional
  exhaustion_policy: fail
logging:
  format: json
",
            )?;
            jail.set_env("CLAIMSIM_SERVER__PORT", "9100");

            let settings = load_settings(None).map_err(|e| e.to_string())?;
            assert_eq!(settings.server.port, 9100);
            assert_eq!(settings.server.max_sessions, 4);
            assert_eq!(settings.generator.variant, Variant::Dimensional);
            assert_eq!(settings.generator.exhaustion_policy, Some(ExhaustionPolicy::Fail));
            assert_eq!(settings.logging.format, LogFormat::Json);
            Ok(())
        });
    }

    #[test]
    fn test_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file("settings.toml", "[generator]\nvariant = \"payor-mix\"\n")?;
            let settings = load_settings(Some(Path::new("settings.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(settings.generator.variant, Variant::PayorMix);
            Ok(())
        });
    }

    #[test]
    fn test_missing_required_file() {
        let result = load_settings(Some(Path::new("/nonexistent/claimsim.yaml")));
        assert!(matches!(result, Err(ConfigError::SourceNotFound(_))));
    }

    #[test]
    fn test_unsupported_file_extension() {
        Jail::expect_with(|jail| {
            jail.create_file("settings.ini", "port=1")?;
            let result = load_settings(Some(Path::new("settings.ini")));
            assert!(matches!(result, Err(ConfigError::UnsupportedSource(_))));
            Ok(())
        });
    }

    #[test]
    fn test_validation_rejects_rows_outside_variant_bounds() {
        Jail::expect_with(|jail| {
            jail.set_env("CLAIMSIM_GENERATOR__ROWS", "10");
            let result = load_settings(None);
            assert!(matches!(result, Err(ConfigError::ValidationError(_))));
            Ok(())
        });
    }

    #[test]
    fn test_validation_rejects_rows_between_steps() {
        Jail::expect_with(|jail| {
            jail.set_env("CLAIMSIM_GENERATOR__ROWS", "1500");
            let result = load_settings(None);
            assert!(matches!(result, Err(ConfigError::ValidationError(_))));
            Ok(())
        });
    }

    #[test]
    fn test_exhaustion_override_applies_to_pools() {
        let generator = GeneratorSettings {
            exhaustion_policy: Some(ExhaustionPolicy::AllowDuplicates),
            ..GeneratorSettings::default()
        };
        let config = generator.config_for(Variant::Dimensional);
        assert!(matches!(
            config.diagnosis_codes,
            claims_engine::CodeSource::Pool {
                policy: ExhaustionPolicy::AllowDuplicates,
                ..
            }
        ));
        assert_eq!(
            generator.config_for(Variant::Classic).diagnosis_codes,
            claims_engine::CodeSource::PerRow
        );
    }

    #[test]
    fn test_rows_resolution() {
        let generator = GeneratorSettings {
            rows: Some(2000),
            ..GeneratorSettings::default()
        };
        assert_eq!(generator.rows_for(Variant::Classic, Some(5000)), 5000);
        assert_eq!(generator.rows_for(Variant::Classic, None), 2000);
        assert_eq!(generator.rows_for(Variant::PayorMix, None), 377_000);
    }
}
