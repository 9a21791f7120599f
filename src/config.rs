use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = ".gatorconfig.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot locate home directory (set HOME or GATOR_CONFIG)")]
    NoHome,
    #[error("cannot access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Local settings: where the database lives and who is logged in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub db_url: String,
    #[serde(default, rename = "current_user_name")]
    pub current_user: String,
}

impl Config {
    /// `$GATOR_CONFIG` if set, else `~/.gatorconfig.json`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        if let Ok(p) = env::var("GATOR_CONFIG") {
            if !p.is_empty() { return Ok(PathBuf::from(p)); }
        }
        let home = env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .ok_or(ConfigError::NoHome)?;
        Ok(PathBuf::from(home).join(CONFIG_FILE_NAME))
    }

    pub fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        serde_json::from_slice(&data).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        let data = serde_json::to_vec_pretty(self).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        fs::write(path, data).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })
    }

    /// Set the current user and persist the whole file.
    pub fn set_user(&mut self, name: &str, path: &Path) -> Result<(), ConfigError> {
        self.current_user = name.to_string();
        self.write_to(path)
    }
}
