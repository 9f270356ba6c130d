//! Private key lookup and permission repair.
//!
//! Keys are stored by file name in the catalog; the bundled keys directory
//! is checked first, then the user's `~/.ssh` directory. Keys found with
//! group or world access are tightened to `0600` automatically, since the
//! shell client refuses to use them otherwise.

use std::path::{Path, PathBuf};

use crate::error::TetherError;

/// Resolve a key file name against the local keys directory, falling back
/// to the user's SSH directory.
///
/// Returns the first existing path, or [`TetherError::KeyNotFound`] naming
/// both checked locations.
pub fn resolve(
    keys_dir: &Path,
    fallback_dir: &Path,
    key_file: &str,
) -> Result<PathBuf, TetherError> {
    let local = keys_dir.join(key_file);
    if local.is_file() {
        tracing::debug!(path = %local.display(), "key found in local keys directory");
        return Ok(local);
    }
    let fallback = fallback_dir.join(key_file);
    if fallback.is_file() {
        tracing::debug!(path = %fallback.display(), "key found in fallback SSH directory");
        return Ok(fallback);
    }
    Err(TetherError::KeyNotFound {
        name: key_file.to_string(),
        local,
        fallback,
    })
}

/// Tighten a group- or world-accessible private key to `0600`.
///
/// Returns whether a repair happened. A key that is already private is
/// left untouched.
#[cfg(unix)]
pub fn ensure_private_permissions(path: &Path) -> Result<bool, TetherError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    if perms.mode() & 0o077 == 0 {
        return Ok(false);
    }
    perms.set_mode(0o600);
    std::fs::set_permissions(path, perms).map_err(|e| TetherError::PermissionRepairFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(true)
}

/// Permission bits are not meaningful on this platform; the shell client
/// applies its own checks.
#[cfg(not(unix))]
pub fn ensure_private_permissions(path: &Path) -> Result<bool, TetherError> {
    tracing::debug!(path = %path.display(), "skipping key permission check on this platform");
    Ok(false)
}
