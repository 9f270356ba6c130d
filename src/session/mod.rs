//! The connect workflow: list the catalog, take a selection, resolve the
//! key, optionally stage files, then hand the terminal to the shell client.
//!
//! Every failure is reported and returns control to the nearest enclosing
//! menu; nothing here terminates the program.

pub mod staging;
pub mod transport;

use std::io::BufRead;

use chrono::Utc;

use crate::config::settings::Settings;
use crate::error::{self, TetherError};
use crate::history::{HistoryStore, SessionRecord, SessionStatus, HISTORY_LIMIT};
use crate::keys;
use crate::store::{ConnectionProfile, ProfileStore};
use transport::{SessionTarget, Transport};

/// Outcome of parsing a selection prompt answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// 0-based index into the listing.
    Index(usize),
    Quit,
}

/// Parse a 1-based selection against `count` entries. `q` backs out.
pub fn parse_selection(input: &str, count: usize) -> Result<Selection, TetherError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("q") {
        return Ok(Selection::Quit);
    }
    match trimmed.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Ok(Selection::Index(n - 1)),
        _ => Err(TetherError::InvalidSelection {
            input: trimmed.to_string(),
            count,
        }),
    }
}

/// Print the catalog as a 1-based listing.
pub fn print_listing(profiles: &[ConnectionProfile]) {
    for (i, profile) in profiles.iter().enumerate() {
        println!(
            "{:3}. {:<16} {:<28} key: {:<16} {}",
            i + 1,
            profile.name,
            profile.login(),
            profile.key_file,
            profile.description
        );
    }
}

/// Run the interactive workflow: list, select, then the connect/migrate
/// sub-menu for the chosen profile.
///
/// An invalid selection is an error for the caller to report; `q` or EOF
/// backs out cleanly.
pub fn run_interactive(
    settings: &Settings,
    transport: &dyn Transport,
    input: &mut dyn BufRead,
) -> Result<(), TetherError> {
    let store = ProfileStore::load(&settings.store_path)?;
    store.log_issues();
    if store.is_empty() {
        return Err(TetherError::EmptyStore);
    }

    print_listing(store.list());
    eprint!("Select a connection [1-{}] or 'q' to go back: ", store.len());
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        eprintln!();
        return Ok(());
    }
    let profile = match parse_selection(&line, store.len())? {
        Selection::Quit => return Ok(()),
        Selection::Index(i) => &store.list()[i],
    };
    sub_menu(settings, profile, transport, input)
}

/// Connect to a profile by name, as used by `tether connect <name>`.
pub fn connect_by_name(
    settings: &Settings,
    name: &str,
    migrate: bool,
    transport: &dyn Transport,
    input: &mut dyn BufRead,
) -> Result<(), TetherError> {
    let store = ProfileStore::load(&settings.store_path)?;
    store.log_issues();
    if store.is_empty() {
        return Err(TetherError::EmptyStore);
    }
    let profile = store
        .find(name)
        .ok_or_else(|| TetherError::ProfileNotFound {
            name: name.to_string(),
        })?;
    connect(settings, profile, transport, migrate, input)
}

/// The connect / migrate-then-connect sub-menu for one selected profile.
///
/// Failures inside an action are reported and drop back into this menu.
fn sub_menu(
    settings: &Settings,
    profile: &ConnectionProfile,
    transport: &dyn Transport,
    input: &mut dyn BufRead,
) -> Result<(), TetherError> {
    loop {
        eprintln!();
        eprintln!("{}:", profile);
        eprintln!("  c) connect");
        eprintln!("  m) copy staged files, then connect");
        eprintln!("  b) back");
        eprint!("> ");
        let mut choice = String::new();
        if input.read_line(&mut choice)? == 0 {
            eprintln!();
            return Ok(());
        }
        match choice.trim().to_lowercase().as_str() {
            "c" | "connect" | "" => {
                match connect(settings, profile, transport, false, input) {
                    Ok(()) => return Ok(()),
                    Err(err) => error::report(&err),
                }
            }
            "m" | "migrate" => {
                match connect(settings, profile, transport, true, input) {
                    Ok(()) => return Ok(()),
                    Err(err) => error::report(&err),
                }
            }
            "b" | "back" | "q" => return Ok(()),
            other => eprintln!("Unrecognized choice '{}'", other),
        }
    }
}

/// Resolve the key for `profile` and open the session, optionally staging
/// files first.
///
/// When `migrate` is set and the user declines the staging prompt, no
/// session is opened and control returns to the caller.
pub fn connect(
    settings: &Settings,
    profile: &ConnectionProfile,
    transport: &dyn Transport,
    migrate: bool,
    input: &mut dyn BufRead,
) -> Result<(), TetherError> {
    let key_path = keys::resolve(
        &settings.keys_dir,
        &settings.fallback_key_dir,
        &profile.key_file,
    )?;
    if keys::ensure_private_permissions(&key_path)? {
        tracing::info!(key = %key_path.display(), "tightened key permissions to 0600");
    }

    let target = SessionTarget {
        user: effective_user(profile, settings),
        address: profile.address.clone(),
        key_path,
    };

    if migrate && !staging::run_staging(&settings.staging_dir, &target, transport, input)? {
        return Ok(());
    }

    let result = transport.open_shell(&target);
    record_session(settings, profile, &target, &result);
    result
}

/// A profile written without a user (possible through manual edits) falls
/// back to the configured default.
fn effective_user(profile: &ConnectionProfile, settings: &Settings) -> String {
    if profile.user.trim().is_empty() {
        settings.default_user.clone()
    } else {
        profile.user.clone()
    }
}

/// Best-effort session log append; the session itself already happened, so
/// a history failure only warns.
fn record_session(
    settings: &Settings,
    profile: &ConnectionProfile,
    target: &SessionTarget,
    result: &Result<(), TetherError>,
) {
    let record = SessionRecord {
        profile: profile.name.clone(),
        target: target.login(),
        timestamp: Utc::now(),
        status: match result {
            Ok(()) => SessionStatus::Completed,
            Err(_) => SessionStatus::Failed,
        },
        error: result.as_ref().err().map(|e| e.to_string()),
    };
    match HistoryStore::load(&settings.data_dir, HISTORY_LIMIT) {
        Ok(mut history) => {
            if let Err(e) = history.append(record) {
                tracing::warn!("could not record session history: {}", e);
            }
        }
        Err(e) => tracing::warn!("could not open session history: {}", e),
    }
}
