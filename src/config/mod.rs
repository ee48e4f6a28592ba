//! Configuration — loaded from ~/.lumius/config.yaml.
//!
//! Every field is optional. A missing file means defaults; a malformed file
//! is reported and the defaults are used instead.

pub mod launch;
pub mod remote;

pub use launch::LaunchConfig;
pub use remote::RemoteConfig;

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::params::ParamLimits;

/// Error reading or parsing a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LumiusConfig {
    /// Control file written by the local surface.
    pub control_file: PathBuf,
    /// Process patterns terminated on shutdown.
    pub kill_patterns: Vec<String>,
    /// Speed and intensity ranges for the local surface.
    pub limits: ParamLimits,
    /// Builtin theme name.
    pub theme: String,
    pub remote: RemoteConfig,
    pub launch: LaunchConfig,
}

impl Default for LumiusConfig {
    fn default() -> Self {
        Self {
            control_file: PathBuf::from("../openframeworks-visualizer/bin/data/control.txt"),
            kill_patterns: vec!["openframeworks-visualizer".to_string()],
            limits: ParamLimits::local(),
            theme: "neon".to_string(),
            remote: RemoteConfig::default(),
            launch: LaunchConfig::default(),
        }
    }
}

/// Directory holding config, theme and log files (~/.lumius).
pub fn config_dir() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".lumius");
    path
}

/// Default config path (~/.lumius/config.yaml).
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}

impl LumiusConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` (or the default path), falling back to defaults on error.
    pub fn load(path: Option<&Path>) -> Self {
        let default_path = default_config_path();
        let path = path.unwrap_or(&default_path);
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "using default configuration");
                Self::default()
            }
        }
    }
}
