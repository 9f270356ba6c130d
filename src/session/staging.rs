//! Migration staging: local files copied to the remote host before a
//! session.
//!
//! The staging directory's entire contents land under `migration/` in the
//! remote home directory. An empty staging directory still prompts, so the
//! remote directory can be prepared ahead of time.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::TetherError;
use crate::session::transport::{SessionTarget, Transport};

/// Remote directory that receives staged files, relative to the login home.
pub const REMOTE_STAGING_DIR: &str = "migration";

/// List the staged files, relative to the staging directory.
///
/// A missing staging directory is treated as empty.
pub fn staged_files(staging_dir: &Path) -> Result<Vec<PathBuf>, TetherError> {
    let mut files = Vec::new();
    if !staging_dir.exists() {
        return Ok(files);
    }
    for entry in WalkDir::new(staging_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            let relative = entry
                .path()
                .strip_prefix(staging_dir)
                .unwrap_or(entry.path());
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}

/// Show the staged files, ask for confirmation, then create the remote
/// directory and copy the staging contents into it.
///
/// Returns `Ok(true)` once the remote side is ready, `Ok(false)` if the
/// user declined. A failed remote step propagates as an error so the
/// caller can return to its menu instead of connecting.
pub fn run_staging(
    staging_dir: &Path,
    target: &SessionTarget,
    transport: &dyn Transport,
    input: &mut dyn BufRead,
) -> Result<bool, TetherError> {
    let files = staged_files(staging_dir)?;
    if files.is_empty() {
        eprintln!("No files staged in {}", staging_dir.display());
    } else {
        eprintln!("Staged files in {}:", staging_dir.display());
        for file in &files {
            eprintln!("  {}", file.display());
        }
    }

    eprint!(
        "Copy {} file(s) to {}:{}/? [y/N] ",
        files.len(),
        target.login(),
        REMOTE_STAGING_DIR
    );
    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        // EOF counts as a decline.
        eprintln!();
        return Ok(false);
    }
    if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
        eprintln!("Migration skipped.");
        return Ok(false);
    }

    transport.create_remote_dir(target, REMOTE_STAGING_DIR)?;
    if files.is_empty() {
        eprintln!(
            "Remote {}/ directory ready; nothing to copy.",
            REMOTE_STAGING_DIR
        );
    } else {
        transport.copy_dir(target, staging_dir, REMOTE_STAGING_DIR)?;
        eprintln!(
            "Copied {} file(s) to {}:{}/",
            files.len(),
            target.login(),
            REMOTE_STAGING_DIR
        );
    }
    Ok(true)
}
