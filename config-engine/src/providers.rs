use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Toml, Yaml};
use figment::Figment;

use crate::error::{ConfigError, Result};

/// Environment prefix for every setting, e.g. `CLAIMSIM_SERVER__PORT`
pub const ENV_PREFIX: &str = "CLAIMSIM_";

/// Separator between nested keys in environment variable names
pub const ENV_SEPARATOR: &str = "__";

/// One layer of settings; later layers override earlier ones
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// YAML or TOML file, picked by extension
    File { path: PathBuf, required: bool },
    /// Prefixed environment variables
    Env { prefix: String },
}

impl ConfigSource {
    /// A file that must exist
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ConfigSource::File {
            path: path.into(),
            required: true,
        }
    }

    /// A file that is skipped when absent
    pub fn optional_file(path: impl Into<PathBuf>) -> Self {
        ConfigSource::File {
            path: path.into(),
            required: false,
        }
    }

    pub fn env() -> Self {
        ConfigSource::Env {
            prefix: ENV_PREFIX.to_string(),
        }
    }

    pub(crate) fn merge_into(&self, figment: Figment) -> Result<Figment> {
        match self {
            ConfigSource::File { path, required } => {
                if !path.exists() {
                    if *required {
                        return Err(ConfigError::SourceNotFound(path.clone()));
                    }
                    tracing::debug!(path = %path.display(), "Optional configuration file not present");
                    return Ok(figment);
                }
                match extension(path).as_deref() {
                    Some("yaml" | "yml") => Ok(figment.merge(Yaml::file(path))),
                    Some("toml") => Ok(figment.merge(Toml::file(path))),
                    _ => Err(ConfigError::UnsupportedSource(path.clone())),
                }
            }
            ConfigSource::Env { prefix } => Ok(figment.merge(Env::prefixed(prefix).split(ENV_SEPARATOR))),
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}
