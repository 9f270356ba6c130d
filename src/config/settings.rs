//! Runtime settings, built once at startup and passed by reference into
//! every component.
//!
//! Optional overrides come from `config.toml` in the tether config
//! directory; everything else defaults to paths under the data directory.

use std::path::PathBuf;

use serde::Deserialize;

use crate::config::paths;
use crate::error::TetherError;

/// Login user applied when a profile is created without one.
pub const DEFAULT_USER: &str = "root";

/// Verbosity level controlling tracing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Suppress all output except errors
    Quiet,
    /// Normal output (info level)
    Normal,
    /// Verbose output (debug level)
    Verbose,
    /// Maximum output (trace level)
    Trace,
}

impl From<(bool, u8)> for Verbosity {
    /// Convert from (quiet_flag, verbose_count) to Verbosity.
    ///
    /// - quiet=true -> Quiet (regardless of verbose count)
    /// - verbose=0  -> Normal
    /// - verbose=1  -> Verbose
    /// - verbose=2+ -> Trace
    fn from((quiet, verbose_count): (bool, u8)) -> Self {
        if quiet {
            Verbosity::Quiet
        } else {
            match verbose_count {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

impl Verbosity {
    /// Return the tracing filter string for this verbosity level.
    pub fn as_tracing_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
            Verbosity::Trace => "trace",
        }
    }
}

/// Serialized `config.toml` format. Every field is optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    /// Path of the connection catalog file.
    #[serde(default)]
    pub store: Option<PathBuf>,
    /// Directory holding bundled private keys.
    #[serde(default)]
    pub keys_dir: Option<PathBuf>,
    /// Directory whose contents the migrate workflow copies to the host.
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
    /// Login user applied when a profile omits one.
    #[serde(default)]
    pub default_user: Option<String>,
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub store_path: PathBuf,
    pub keys_dir: PathBuf,
    pub fallback_key_dir: PathBuf,
    pub staging_dir: PathBuf,
    pub default_user: String,
}

impl Settings {
    /// Load settings, applying `config.toml` overrides when present.
    pub fn load() -> Result<Self, TetherError> {
        let config_dir = paths::tether_config_dir()?;
        let config_file = config_dir.join("config.toml");
        let overrides = if config_file.exists() {
            let contents = std::fs::read_to_string(&config_file)?;
            toml::from_str(&contents)
                .map_err(|e| TetherError::Config(format!("Invalid config.toml: {}", e)))?
        } else {
            ConfigFile::default()
        };
        Self::from_overrides(overrides)
    }

    fn from_overrides(overrides: ConfigFile) -> Result<Self, TetherError> {
        let data_dir = paths::tether_data_dir()?;
        Ok(Self {
            store_path: overrides
                .store
                .unwrap_or_else(|| data_dir.join("connections.txt")),
            keys_dir: overrides.keys_dir.unwrap_or_else(|| data_dir.join("keys")),
            fallback_key_dir: paths::default_ssh_dir()?,
            staging_dir: overrides
                .staging_dir
                .unwrap_or_else(|| data_dir.join("migration")),
            default_user: overrides
                .default_user
                .unwrap_or_else(|| DEFAULT_USER.to_string()),
            data_dir,
        })
    }
}
