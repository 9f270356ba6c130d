//! Top-level interactive menu: add, connect, quit.
//!
//! Every workflow failure is reported and drops back here; only an
//! explicit quit (or EOF on stdin) leaves the loop.

use std::io::BufRead;

use crate::config::settings::Settings;
use crate::error::{self, TetherError};
use crate::session;
use crate::session::transport::Transport;
use crate::store::{ConnectionProfile, ProfileStore};

pub fn run(settings: &Settings, transport: &dyn Transport) -> Result<(), TetherError> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    run_with_input(settings, transport, &mut input)
}

fn run_with_input(
    settings: &Settings,
    transport: &dyn Transport,
    input: &mut dyn BufRead,
) -> Result<(), TetherError> {
    loop {
        eprintln!();
        eprintln!("tether");
        eprintln!("  1) add a connection");
        eprintln!("  2) connect to a host");
        eprintln!("  3) quit");
        eprint!("> ");
        let mut choice = String::new();
        if input.read_line(&mut choice)? == 0 {
            eprintln!();
            return Ok(());
        }
        match choice.trim().to_lowercase().as_str() {
            "1" | "a" | "add" => {
                if let Err(err) = add_interactive(settings, input) {
                    error::report(&err);
                }
            }
            "2" | "c" | "connect" => {
                if let Err(err) = session::run_interactive(settings, transport, input) {
                    error::report(&err);
                }
            }
            "3" | "q" | "quit" => return Ok(()),
            "" => {}
            other => eprintln!("Unrecognized choice '{}'", other),
        }
    }
}

/// Prompt for each profile field and append the result to the catalog.
///
/// The user field may be left empty to take the configured default.
/// Validation (required fields, reserved separator) happens in the store.
fn add_interactive(settings: &Settings, input: &mut dyn BufRead) -> Result<(), TetherError> {
    let name = prompt_field(input, "Name")?;
    let description = prompt_field(input, "Description (optional)")?;
    let address = prompt_field(input, "Address (IP or hostname)")?;
    let user = prompt_field(input, &format!("User [{}]", settings.default_user))?;
    let key_file = prompt_field(input, "Key file name")?;

    let profile = ConnectionProfile {
        name,
        description,
        address,
        user: if user.is_empty() {
            settings.default_user.clone()
        } else {
            user
        },
        key_file,
    };

    let mut store = ProfileStore::load(&settings.store_path)?;
    if store.find(&profile.name).is_some() {
        eprintln!(
            "note: a connection named '{}' already exists; name lookups use the first one",
            profile.name
        );
    }
    let name = profile.name.clone();
    store.append(profile)?;
    eprintln!("Saved '{}'.", name);
    Ok(())
}

fn prompt_field(input: &mut dyn BufRead, label: &str) -> Result<String, TetherError> {
    eprint!("{}: ", label);
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
