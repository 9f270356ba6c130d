use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::TetherError;

/// Maximum number of session records kept on disk.
pub const HISTORY_LIMIT: usize = 200;

/// Outcome of one connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Completed,
    Failed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Completed => write!(f, "completed"),
            SessionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A single session log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub profile: String,
    /// The `user@address` login string used.
    pub target: String,
    pub timestamp: DateTime<Utc>,
    pub status: SessionStatus,
    pub error: Option<String>,
}

/// Persistent session log backed by a JSON file.
///
/// Stores records in `history.json` within the tether data directory.
/// Entries are capped at [`HISTORY_LIMIT`]; oldest entries are removed when
/// the limit is exceeded.
///
/// An exclusive advisory lock on `history.lock` is held for the entire
/// lifetime of this struct and released automatically on drop, preventing
/// concurrent writers from corrupting the history file.
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<SessionRecord>,
    limit: usize,
    /// Holds the open lock file. The `fs2` exclusive lock is tied to the
    /// file descriptor; dropping this field releases the lock.
    _lock_file: File,
}

impl HistoryStore {
    /// Load history from `data_dir/history.json`.
    ///
    /// Acquires an exclusive advisory lock on `data_dir/history.lock`
    /// before reading the state file; the lock is held until the returned
    /// store is dropped. If the history file does not exist, returns an
    /// empty history. If the file is corrupted, logs a warning and starts
    /// fresh.
    pub fn load(data_dir: &Path, limit: usize) -> Result<Self, TetherError> {
        let lock_path = data_dir.join("history.lock");
        let lock_file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        lock_file.lock_exclusive()?;

        let path = data_dir.join("history.json");

        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<Vec<SessionRecord>>(&contents) {
                Ok(entries) => Ok(Self {
                    path,
                    entries,
                    limit,
                    _lock_file: lock_file,
                }),
                Err(e) => {
                    tracing::warn!("Corrupted history.json, starting fresh: {}", e);
                    Ok(Self {
                        path,
                        entries: Vec::new(),
                        limit,
                        _lock_file: lock_file,
                    })
                }
            }
        } else {
            Ok(Self {
                path,
                entries: Vec::new(),
                limit,
                _lock_file: lock_file,
            })
        }
    }

    /// Append a new record, truncating oldest if over limit.
    ///
    /// Automatically saves to disk after appending.
    pub fn append(&mut self, record: SessionRecord) -> Result<(), TetherError> {
        self.entries.push(record);

        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }

        self.save()
    }

    /// Return a slice of all records, oldest first.
    pub fn list(&self) -> &[SessionRecord] {
        &self.entries
    }

    /// Clear all records.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Save history to disk atomically (write temp, rename).
    pub fn save(&self) -> Result<(), TetherError> {
        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}
