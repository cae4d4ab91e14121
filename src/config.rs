//! Tool configuration
//!
//! Three sources in precedence order:
//! 1. Built-in defaults
//! 2. Optional TOML config file (`.values-hoist.toml` in the root, or an
//!    explicit `--config` path)
//! 3. CLI flags
//!
//! File and CLI fields are all optional and only override when present.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flatten::DEFAULT_SEPARATOR;

/// Default config file name, looked up in the root directory
pub const DEFAULT_CONFIG_FILENAME: &str = ".values-hoist.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("separator must not be empty")]
    EmptySeparator,

    #[error("shared filename must be a bare file name, got '{0}'")]
    InvalidSharedFilename(String),

    #[error("invalid layer glob pattern: {0}")]
    InvalidLayerGlob(#[from] globset::Error),
}

/// Effective tool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoistConfig {
    /// File name of both shared and service documents
    #[serde(default = "default_shared_filename")]
    pub shared_filename: String,

    /// Glob matched against layer directory names
    #[serde(default = "default_layer_glob")]
    pub layer_glob: String,

    /// Flat path separator between key segments
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_shared_filename() -> String {
    "values.yaml".to_string()
}

fn default_layer_glob() -> String {
    "*".to_string()
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

impl Default for HoistConfig {
    fn default() -> Self {
        Self {
            shared_filename: default_shared_filename(),
            layer_glob: default_layer_glob(),
            separator: default_separator(),
        }
    }
}

/// Optional overrides from a config file or CLI flags
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigOverrides {
    pub shared_filename: Option<String>,
    pub layer_glob: Option<String>,
    pub separator: Option<String>,
}

impl HoistConfig {
    /// Build the effective config: defaults, then the config file (the
    /// explicit path if given, else `.values-hoist.toml` under `root`
    /// when present), then CLI overrides.
    pub fn load(
        root: &Path,
        explicit_path: Option<&Path>,
        cli: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let file_path = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default_path = root.join(DEFAULT_CONFIG_FILENAME);
                default_path.exists().then_some(default_path)
            }
        };
        if let Some(path) = file_path {
            let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            let overrides: ConfigOverrides =
                toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })?;
            config.apply(overrides);
        }

        config.apply(cli);
        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(filename) = overrides.shared_filename {
            self.shared_filename = filename;
        }
        if let Some(glob) = overrides.layer_glob {
            self.layer_glob = glob;
        }
        if let Some(separator) = overrides.separator {
            self.separator = separator;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.separator.is_empty() {
            return Err(ConfigError::EmptySeparator);
        }
        if self.shared_filename.is_empty()
            || self.shared_filename.contains(std::path::MAIN_SEPARATOR)
        {
            return Err(ConfigError::InvalidSharedFilename(
                self.shared_filename.clone(),
            ));
        }
        globset::Glob::new(&self.layer_glob)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = HoistConfig::default();
        assert_eq!(config.shared_filename, "values.yaml");
        assert_eq!(config.layer_glob, "*");
        assert_eq!(config.separator, "___");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config =
            HoistConfig::load(dir.path(), None, ConfigOverrides::default()).unwrap();
        assert_eq!(config, HoistConfig::default());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILENAME),
            "layer_glob = \"ttom*\"\nseparator = \"::\"\n",
        )
        .unwrap();

        let config =
            HoistConfig::load(dir.path(), None, ConfigOverrides::default()).unwrap();
        assert_eq!(config.layer_glob, "ttom*");
        assert_eq!(config.separator, "::");
        assert_eq!(config.shared_filename, "values.yaml");
    }

    #[test]
    fn test_cli_overrides_beat_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILENAME),
            "layer_glob = \"ttom*\"\n",
        )
        .unwrap();

        let cli = ConfigOverrides {
            layer_glob: Some("prod-*".to_string()),
            ..ConfigOverrides::default()
        };
        let config = HoistConfig::load(dir.path(), None, cli).unwrap();
        assert_eq!(config.layer_glob, "prod-*");
    }

    #[test]
    fn test_empty_separator_rejected() {
        let dir = TempDir::new().unwrap();
        let cli = ConfigOverrides {
            separator: Some(String::new()),
            ..ConfigOverrides::default()
        };
        let result = HoistConfig::load(dir.path(), None, cli);
        assert!(matches!(result, Err(ConfigError::EmptySeparator)));
    }

    #[test]
    fn test_shared_filename_must_be_bare() {
        let dir = TempDir::new().unwrap();
        let cli = ConfigOverrides {
            shared_filename: Some("nested/values.yaml".to_string()),
            ..ConfigOverrides::default()
        };
        let result = HoistConfig::load(dir.path(), None, cli);
        assert!(matches!(result, Err(ConfigError::InvalidSharedFilename(_))));
    }

    #[test]
    fn test_missing_explicit_config_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let result = HoistConfig::load(dir.path(), Some(&missing), ConfigOverrides::default());
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
