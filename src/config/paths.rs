//! Platform-specific config and data directory helpers.
//!
//! Uses the `dirs` crate to resolve platform-appropriate directories:
//! - Linux:   `~/.config/tether/` (config), `~/.local/share/tether/` (data)
//! - Windows: `%APPDATA%\tether\` (config and data)
//! - macOS:   `~/Library/Application Support/tether/` (both)
//!
//! The `TETHER_CONFIG_DIR` and `TETHER_DATA_DIR` environment variables
//! override the base directories entirely; the integration tests rely on
//! this to run against throwaway locations.

use std::path::PathBuf;

use crate::error::TetherError;

/// Get the tether config directory, creating it if needed.
pub fn tether_config_dir() -> Result<PathBuf, TetherError> {
    if let Ok(dir) = std::env::var("TETHER_CONFIG_DIR") {
        return ensure_dir(PathBuf::from(dir));
    }
    let base = dirs::config_dir()
        .ok_or_else(|| TetherError::Config("Could not determine config directory".into()))?;
    ensure_dir(base.join("tether"))
}

/// Get the tether data directory, creating it if needed.
///
/// Holds the connection catalog, the bundled keys directory, the migration
/// staging directory, and the session history file.
pub fn tether_data_dir() -> Result<PathBuf, TetherError> {
    if let Ok(dir) = std::env::var("TETHER_DATA_DIR") {
        return ensure_dir(PathBuf::from(dir));
    }
    let base = dirs::data_dir()
        .ok_or_else(|| TetherError::Config("Could not determine data directory".into()))?;
    ensure_dir(base.join("tether"))
}

/// The user's default SSH directory, consulted when a key is not bundled
/// with the catalog.
pub fn default_ssh_dir() -> Result<PathBuf, TetherError> {
    let home = dirs::home_dir()
        .ok_or_else(|| TetherError::Config("Could not determine home directory".into()))?;
    Ok(home.join(".ssh"))
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf, TetherError> {
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}
