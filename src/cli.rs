//! Command-line interface for wordrush.

use clap::{Parser, Subcommand};

/// Wordrush - capacity-gated timed word-guessing game
#[derive(Parser, Debug)]
#[command(name = "wordrush")]
#[command(about = "Timed word-guessing game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Host to bind to (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,
    },

    /// Print the active secret-word vocabulary
    Vocab,
}
