use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TetherError {
    #[error("No connections saved yet")]
    EmptyStore,

    #[error("Invalid selection '{input}': expected a number between 1 and {count}")]
    InvalidSelection { input: String, count: usize },

    #[error("No connection named '{name}'")]
    ProfileNotFound { name: String },

    #[error("Key file '{name}' not found in {} or {}", local.display(), fallback.display())]
    KeyNotFound {
        name: String,
        local: PathBuf,
        fallback: PathBuf,
    },

    #[error("Could not fix permissions on {}: {reason}", path.display())]
    PermissionRepairFailed { path: PathBuf, reason: String },

    #[error("Failed to create remote directory on {target}: {reason}")]
    RemoteDirCreateFailed { target: String, reason: String },

    #[error("File copy to {target} failed: {reason}")]
    CopyFailed { target: String, reason: String },

    #[error("Invalid connection profile: {0}")]
    InvalidProfile(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TetherError {
    /// Returns a user-friendly suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            TetherError::EmptyStore => {
                Some("Add a connection first with `tether add <name> <address> --key <file>`.")
            }
            TetherError::InvalidSelection { .. } => {
                Some("Pick one of the listed numbers, or 'q' to go back.")
            }
            TetherError::ProfileNotFound { .. } => {
                Some("Run `tether list` to see saved connections.")
            }
            TetherError::KeyNotFound { .. } => {
                Some("Place the key file in the keys directory, or check the key name stored for this connection.")
            }
            TetherError::PermissionRepairFailed { .. } => {
                Some("Fix the key permissions manually: chmod 600 <key file>.")
            }
            TetherError::RemoteDirCreateFailed { .. } => {
                Some("Check that the host is reachable and the account can write to its home directory.")
            }
            TetherError::CopyFailed { .. } => {
                Some("Re-run the migration once the connection is stable.")
            }
            TetherError::InvalidProfile(_) => {
                Some("Profile fields must not contain '|' or line breaks; name, address, and key are required.")
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TetherError {
    fn from(err: serde_json::Error) -> Self {
        TetherError::Config(err.to_string())
    }
}

impl From<walkdir::Error> for TetherError {
    fn from(err: walkdir::Error) -> Self {
        TetherError::Io {
            source: err.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "walkdir error")
            }),
        }
    }
}

/// Display a TetherError with optional suggestion hint to stderr.
pub fn report(err: &TetherError) {
    eprintln!("error: {}", err);
    if let Some(suggestion) = err.suggestion() {
        eprintln!("  hint: {}", suggestion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn empty_store_display_and_suggestion() {
        let err = TetherError::EmptyStore;
        assert!(format!("{}", err).contains("No connections"));
        assert_eq!(
            err.suggestion(),
            Some("Add a connection first with `tether add <name> <address> --key <file>`.")
        );
    }

    #[test]
    fn invalid_selection_display() {
        let err = TetherError::InvalidSelection {
            input: "abc".to_string(),
            count: 3,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("abc"));
        assert!(msg.contains("between 1 and 3"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn key_not_found_names_both_paths() {
        let err = TetherError::KeyNotFound {
            name: "web.pem".to_string(),
            local: PathBuf::from("/data/keys/web.pem"),
            fallback: PathBuf::from("/home/me/.ssh/web.pem"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("/data/keys/web.pem"));
        assert!(msg.contains("/home/me/.ssh/web.pem"));
    }

    #[test]
    fn permission_repair_failed_suggestion() {
        let err = TetherError::PermissionRepairFailed {
            path: PathBuf::from("/data/keys/web.pem"),
            reason: "read-only filesystem".to_string(),
        };
        assert_eq!(
            err.suggestion(),
            Some("Fix the key permissions manually: chmod 600 <key file>.")
        );
    }

    #[test]
    fn io_error_no_suggestion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file gone");
        let err: TetherError = io_err.into();
        assert!(err.suggestion().is_none());
    }

    #[test]
    fn invalid_profile_display() {
        let err = TetherError::InvalidProfile("field 'name' must not contain '|'".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Invalid connection profile"));
        assert!(msg.contains("'|'"));
    }
}
