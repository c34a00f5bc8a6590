//! Optional user configuration.
//! Location: <config dir>/gamsreg/config.toml, or the `--config` argument.

use crate::DEFAULT_DICT_TYPE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GamsregConfig {
    /// Defaults for new registry entries
    #[serde(default)]
    pub install: InstallConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for new registry entries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallConfig {
    /// Dictionary type used when the command line gives none
    #[serde(default = "default_dict_type")]
    pub dict_type: String,
    /// Thread-safety flag written on the library line
    #[serde(default = "default_thread_safe")]
    pub thread_safe: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            dict_type: default_dict_type(),
            thread_safe: default_thread_safe(),
        }
    }
}

fn default_dict_type() -> String {
    DEFAULT_DICT_TYPE.to_string()
}

fn default_thread_safe() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default configuration file location, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gamsreg").join("config.toml"))
}

/// Load configuration from `path`, or from the default location.
///
/// A missing default file yields the defaults; an explicitly named file
/// must exist.
pub fn load_config(path: Option<&Path>) -> Result<GamsregConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(GamsregConfig::default()),
        },
    };

    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
}
