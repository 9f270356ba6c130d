use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tether", version, about = "Personal SSH connection manager")]
pub struct Cli {
    /// Runs the interactive menu when no subcommand is given.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase verbosity (-v for verbose, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode: suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save a new connection
    Add(AddArgs),

    /// List saved connections
    List,

    /// Connect to a saved host
    Connect(ConnectArgs),

    /// View past sessions
    History(HistoryArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `tether add` command.
#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Name for the connection (e.g., web, db-prod)
    pub name: String,

    /// IP address or hostname
    pub address: String,

    /// Private key file name (resolved against the keys directory, then ~/.ssh)
    #[arg(short, long)]
    pub key: String,

    /// Free-form description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Login user (defaults to the configured default user)
    #[arg(short, long)]
    pub user: Option<String>,
}

/// Arguments for the `tether connect` command.
#[derive(clap::Args, Debug)]
pub struct ConnectArgs {
    /// Connection name; prompts for a selection when omitted
    pub name: Option<String>,

    /// Copy the staging directory to the host before connecting
    #[arg(long)]
    pub migrate: bool,
}

/// Arguments for the `tether history` command.
#[derive(clap::Args, Debug)]
pub struct HistoryArgs {
    /// Maximum number of entries to show
    #[arg(short = 'n', long, default_value = "20")]
    pub count: usize,

    /// Clear all history
    #[arg(long)]
    pub clear: bool,
}

/// Arguments for the `tether completions` command.
#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
