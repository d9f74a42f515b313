//! Command-line interface for memory_match.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Memory Match - card matching game server
#[derive(Parser, Debug)]
#[command(name = "memory_match")]
#[command(about = "Memory match game server with REST API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Optional TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides config and DATABASE_URL)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Apply pending database migrations and exit
    Migrate,

    /// Print the current leaderboard as JSON
    Leaderboard,
}
