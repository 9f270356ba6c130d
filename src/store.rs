//! Pipe-delimited connection catalog.
//!
//! One profile per line in fixed field order
//! `name|description|address|user|key_file`. The file only ever grows by
//! append; existing lines are never rewritten or reordered, and the program
//! offers no update or delete operation (editing the file by hand is the
//! removal path).
//!
//! The separator is reserved: `append` refuses fields containing `|` or
//! line breaks, and `load` skips lines with the wrong field count, keeping
//! a per-line diagnostic instead of faulting.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::TetherError;

/// Reserved field separator of the catalog file.
pub const FIELD_SEPARATOR: char = '|';

const FIELD_COUNT: usize = 5;

/// One stored connection record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    /// Unique by convention, not enforced; first match wins on lookup.
    pub name: String,
    /// Free-form, may be empty.
    pub description: String,
    /// IP address or hostname.
    pub address: String,
    /// Login user.
    pub user: String,
    /// Key file name, resolved against the keys directory then `~/.ssh`.
    pub key_file: String,
}

impl ConnectionProfile {
    /// The `user@address` login string passed to the shell client.
    pub fn login(&self) -> String {
        format!("{}@{}", self.user, self.address)
    }

    fn to_line(&self) -> String {
        [
            self.name.as_str(),
            self.description.as_str(),
            self.address.as_str(),
            self.user.as_str(),
            self.key_file.as_str(),
        ]
        .join("|")
    }

    fn parse_line(line: &str) -> Result<Self, String> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(format!(
                "expected {} fields, found {}",
                FIELD_COUNT,
                fields.len()
            ));
        }
        Ok(Self {
            name: fields[0].to_string(),
            description: fields[1].to_string(),
            address: fields[2].to_string(),
            user: fields[3].to_string(),
            key_file: fields[4].to_string(),
        })
    }
}

impl fmt::Display for ConnectionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.login())
    }
}

/// A catalog line that could not be parsed into a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// 1-based line number in the backing file.
    pub line: usize,
    pub reason: String,
}

/// In-memory view of the catalog file.
///
/// Loading reads the whole file transiently; appending writes a single
/// trailing line. The file is intentionally unlocked: this is a single-user
/// interactive tool and concurrent invocations are not supported.
pub struct ProfileStore {
    path: PathBuf,
    profiles: Vec<ConnectionProfile>,
    issues: Vec<ParseIssue>,
}

impl ProfileStore {
    /// Load all profiles from the backing file, in file order.
    ///
    /// A missing file yields an empty store. Malformed lines are skipped
    /// and recorded as [`ParseIssue`]s rather than failing the listing.
    pub fn load(path: &Path) -> Result<Self, TetherError> {
        let mut profiles = Vec::new();
        let mut issues = Vec::new();
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            for (idx, line) in contents.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                match ConnectionProfile::parse_line(line) {
                    Ok(profile) => profiles.push(profile),
                    Err(reason) => issues.push(ParseIssue {
                        line: idx + 1,
                        reason,
                    }),
                }
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
            profiles,
            issues,
        })
    }

    /// Validate and append a profile as one new trailing line, creating the
    /// backing file (and its parent directory) if absent.
    pub fn append(&mut self, profile: ConnectionProfile) -> Result<(), TetherError> {
        validate_profile(&profile)?;
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", profile.to_line())?;
        self.profiles.push(profile);
        Ok(())
    }

    /// All well-formed profiles, in insertion order.
    pub fn list(&self) -> &[ConnectionProfile] {
        &self.profiles
    }

    /// Lines skipped during the last load.
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Log one warning per skipped line.
    pub fn log_issues(&self) {
        for issue in &self.issues {
            tracing::warn!(
                line = issue.line,
                "skipped malformed record: {}",
                issue.reason
            );
        }
    }

    /// Look up a profile by name; the first match wins.
    pub fn find(&self, name: &str) -> Option<&ConnectionProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }
}

/// Write-time validation: required fields present, reserved characters
/// absent. Reading stays lenient so hand-edited files still load.
pub fn validate_profile(profile: &ConnectionProfile) -> Result<(), TetherError> {
    let fields = [
        ("name", &profile.name),
        ("description", &profile.description),
        ("address", &profile.address),
        ("user", &profile.user),
        ("key", &profile.key_file),
    ];
    for (label, value) in fields {
        if value.contains(FIELD_SEPARATOR) || value.contains('\n') || value.contains('\r') {
            return Err(TetherError::InvalidProfile(format!(
                "field '{}' must not contain '|' or line breaks",
                label
            )));
        }
    }
    for (label, value) in [
        ("name", &profile.name),
        ("address", &profile.address),
        ("key", &profile.key_file),
    ] {
        if value.trim().is_empty() {
            return Err(TetherError::InvalidProfile(format!(
                "field '{}' must not be empty",
                label
            )));
        }
    }
    Ok(())
}
