//! Resolution settings and their loading from disk and the environment.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding [`EntitiesConfig::max_deferral_depth`].
pub const MAX_DEFERRAL_DEPTH_ENV: &str = "KEYWAY_MAX_DEFERRAL_DEPTH";

const DEFAULT_MAX_DEFERRAL_DEPTH: usize = 64;

/// Settings for an [`EntitiesResolver`](crate::EntitiesResolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct EntitiesConfig {
    /// How many nested deferred layers a single resolved value may go
    /// through before the call fails.
    pub max_deferral_depth: usize,
}

impl Default for EntitiesConfig {
    fn default() -> Self {
        Self {
            max_deferral_depth: DEFAULT_MAX_DEFERRAL_DEPTH,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Default settings with environment overrides applied.
pub fn load_config() -> Result<EntitiesConfig, ConfigError> {
    let mut config = EntitiesConfig::default();
    apply_env_overrides(&mut config)?;
    validate_config(&config)?;
    Ok(config)
}

/// Loads settings from a JSON file, falling back to defaults when the file
/// does not exist. Environment overrides win over the file.
pub fn load_config_from_path(path: &Path) -> Result<EntitiesConfig, ConfigError> {
    let mut config = if path.exists() {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        debug!(path = %path.display(), "config file not found, using defaults");
        EntitiesConfig::default()
    };
    apply_env_overrides(&mut config)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &EntitiesConfig) -> Result<(), ConfigError> {
    if config.max_deferral_depth == 0 {
        return Err(ConfigError::invalid_value("maxDeferralDepth", "must be at least 1"));
    }
    Ok(())
}

fn apply_env_overrides(config: &mut EntitiesConfig) -> Result<(), ConfigError> {
    if let Ok(raw) = env::var(MAX_DEFERRAL_DEPTH_ENV)
        && !raw.trim().is_empty()
    {
        config.max_deferral_depth = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid_value(MAX_DEFERRAL_DEPTH_ENV, format!("'{raw}' is not a positive integer")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        temp_env::with_var_unset(MAX_DEFERRAL_DEPTH_ENV, || {
            let config = load_config_from_path(&temp_dir.path().join("absent.json")).unwrap();
            assert_eq!(config, EntitiesConfig::default());
        });
    }

    #[test]
    fn reads_camel_case_fields() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("keyway.json");
        fs::write(&path, r#"{ "maxDeferralDepth": 3 }"#).unwrap();

        temp_env::with_var_unset(MAX_DEFERRAL_DEPTH_ENV, || {
            let config = load_config_from_path(&path).unwrap();
            assert_eq!(config.max_deferral_depth, 3);
        });
    }

    #[test]
    fn rejects_unknown_fields() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("keyway.json");
        fs::write(&path, r#"{ "maxDepth": 3 }"#).unwrap();

        temp_env::with_var_unset(MAX_DEFERRAL_DEPTH_ENV, || {
            assert!(matches!(load_config_from_path(&path), Err(ConfigError::Parse { .. })));
        });
    }

    #[test]
    fn environment_overrides_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("keyway.json");
        fs::write(&path, r#"{ "maxDeferralDepth": 3 }"#).unwrap();

        temp_env::with_var(MAX_DEFERRAL_DEPTH_ENV, Some("9"), || {
            let config = load_config_from_path(&path).unwrap();
            assert_eq!(config.max_deferral_depth, 9);
        });
    }

    #[test]
    fn zero_depth_is_invalid() {
        temp_env::with_var(MAX_DEFERRAL_DEPTH_ENV, Some("0"), || {
            assert!(matches!(load_config(), Err(ConfigError::InvalidValue { .. })));
        });
        temp_env::with_var(MAX_DEFERRAL_DEPTH_ENV, Some("deep"), || {
            assert!(matches!(load_config(), Err(ConfigError::InvalidValue { .. })));
        });
    }
}
