//! Shell configuration
//!
//! Loaded once from a JSON file at startup and never changed afterwards.
//!
//! ```json
//! {
//!   "vfs_archive": "fs.zip",
//!   "log_file": "actions.log",
//!   "startup_script": "startup.txt",
//!   "user": "alice",
//!   "computer": "workstation"
//! }
//! ```

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::session::Identity;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn default_user() -> String {
    "user".to_string()
}

fn default_host() -> String {
    "computer".to_string()
}

fn default_mount_dir() -> PathBuf {
    std::env::temp_dir().join("vfs")
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "vfs_archive")]
    pub archive_path: PathBuf,
    #[serde(rename = "log_file")]
    pub log_path: PathBuf,
    #[serde(rename = "startup_script", default)]
    pub startup_script_path: Option<PathBuf>,
    #[serde(rename = "user", default = "default_user")]
    pub user_label: String,
    #[serde(rename = "computer", default = "default_host")]
    pub host_label: String,
    #[serde(default = "default_mount_dir")]
    pub mount_dir: PathBuf,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn identity(&self) -> Identity {
        Identity {
            user: self.user_label.clone(),
            host: self.host_label.clone(),
        }
    }
}
