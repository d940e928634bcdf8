//! Command-line interface for fourline.

use clap::{Parser, Subcommand};

/// Fourline - connect-four with server-synchronized multiplayer rooms
#[derive(Parser, Debug)]
#[command(name = "fourline")]
#[command(about = "Connect-four rules engine with multiplayer rooms", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP room server
    Http {
        /// Port to bind to (overrides config file and environment)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config file and environment)
        #[arg(long)]
        host: Option<String>,

        /// Path to a TOML config file; flags override its values
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Path to the match-history database (created if it doesn't exist)
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Play a same-device match in the terminal
    Local,
}
