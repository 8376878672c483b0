use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that overrides the config file location
pub const CONFIG_ENV_VAR: &str = "SYMDEX_CONFIG";

/// Build and query settings, stored as JSON
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Fail the build when the record list is empty
    #[serde(default)]
    pub require_non_empty: bool,
    /// Abort on the first malformed record instead of skipping it
    #[serde(default)]
    pub strict: bool,
    /// Group limit applied to queries that don't pass their own
    #[serde(default)]
    pub default_limit: Option<usize>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }
    let Some(dirs) = ProjectDirs::from("com", "zaguan", "symdex") else {
        return Path::new("symdex.json").to_path_buf();
    };
    dirs.config_dir().join("config.json")
}

/// Load a config file; a missing file yields the defaults
pub fn load_config(path: &Path) -> Result<IndexConfig, ConfigError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(IndexConfig::default()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_slice(&bytes).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}
