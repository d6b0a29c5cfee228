//! User configuration (`~/.config/pkgfile/config.toml`).
//!
//! ```toml
//! archive = "/var/lib/pacman/sync/core.files"
//! binaries = false
//! color = true
//! ```
//!
//! Every key is optional. A missing file is the same as an empty one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "PKGFILE_CONFIG";

/// Failure to load the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },

    /// The config file is not valid TOML for [`Config`].
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// TOML error.
        source: toml::de::Error,
    },
}

/// Settings read from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Archive scanned when none is given on the command line.
    pub archive: Option<PathBuf>,
    /// Default for the binaries-only filter.
    pub binaries: bool,
    /// Colour terminal output.
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive: None,
            binaries: false,
            color: true,
        }
    }
}

impl Config {
    /// Default config file location, if a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pkgfile").join("config.toml"))
    }

    /// Load the config at `path`, or defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from an explicit path, falling back to [`Config::default_path`].
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}
