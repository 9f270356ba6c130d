use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod error;
mod history;
mod keys;
mod menu;
mod session;
mod store;

use cli::args::{AddArgs, Cli, Commands, ConnectArgs, HistoryArgs};
use config::settings::{Settings, Verbosity};
use error::TetherError;
use history::{HistoryStore, HISTORY_LIMIT};
use session::transport::OpenSsh;
use store::{ConnectionProfile, ProfileStore};

fn main() {
    let cli = Cli::parse();

    // Convert CLI flags to verbosity level
    let verbosity = Verbosity::from((cli.quiet, cli.verbose));

    // Set up tracing with verbosity-based filter
    // RUST_LOG env var overrides CLI flags
    let filter = verbosity.as_tracing_filter();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr) // Keep stdout clean for output
        .init();

    if let Err(err) = run(cli) {
        error::report(&err);
        std::process::exit(1);
    }
}

/// Execute the dispatched command.
fn run(cli: Cli) -> Result<(), TetherError> {
    let settings = Settings::load()?;
    let transport = OpenSsh;

    match cli.command {
        None => menu::run(&settings, &transport),
        Some(Commands::Add(args)) => run_add(&settings, args),
        Some(Commands::List) => run_list(&settings),
        Some(Commands::Connect(args)) => run_connect(&settings, &transport, args),
        Some(Commands::History(args)) => run_history(&settings, args),
        Some(Commands::Completions(args)) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "tether",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

fn run_add(settings: &Settings, args: AddArgs) -> Result<(), TetherError> {
    let mut store = ProfileStore::load(&settings.store_path)?;
    store.log_issues();
    if store.find(&args.name).is_some() {
        eprintln!(
            "note: a connection named '{}' already exists; name lookups use the first one",
            args.name
        );
    }
    let profile = ConnectionProfile {
        name: args.name,
        description: args.description,
        address: args.address,
        user: args.user.unwrap_or_else(|| settings.default_user.clone()),
        key_file: args.key,
    };
    let name = profile.name.clone();
    store.append(profile)?;
    println!("Saved '{}'.", name);
    Ok(())
}

fn run_list(settings: &Settings) -> Result<(), TetherError> {
    let store = ProfileStore::load(&settings.store_path)?;
    store.log_issues();
    if store.is_empty() {
        println!("No connections saved yet. Add one with `tether add <name> <address> --key <file>`.");
        return Ok(());
    }
    session::print_listing(store.list());
    Ok(())
}

fn run_connect(
    settings: &Settings,
    transport: &OpenSsh,
    args: ConnectArgs,
) -> Result<(), TetherError> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    match args.name {
        Some(name) => {
            session::connect_by_name(settings, &name, args.migrate, transport, &mut input)
        }
        None => session::run_interactive(settings, transport, &mut input),
    }
}

fn run_history(settings: &Settings, args: HistoryArgs) -> Result<(), TetherError> {
    let mut history = HistoryStore::load(&settings.data_dir, HISTORY_LIMIT)?;
    if args.clear {
        history.clear();
        history.save()?;
        println!("History cleared.");
        return Ok(());
    }
    if history.list().is_empty() {
        println!("No sessions recorded yet.");
        return Ok(());
    }
    let entries = history.list();
    let start = entries.len().saturating_sub(args.count);
    for record in &entries[start..] {
        print!(
            "{}  {:<9} {:<16} {}",
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.status,
            record.profile,
            record.target
        );
        match &record.error {
            Some(err) => println!("  ({})", err),
            None => println!(),
        }
    }
    Ok(())
}
