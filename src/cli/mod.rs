//! CLI module for Portal
//!
//! Provides command-line interface parsing for the portal-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Portal - two-tier CRUD API server
///
/// Serves an open `/api/v1` surface and a token-gated `/api/v2` surface
/// over the same collections.
#[derive(Parser, Debug)]
#[command(
    name = "portal-server",
    version,
    about = "Portal - two-tier CRUD API server",
    long_about = "A CRUD API server with an open /api/v1 tier and a bearer-token /api/v2 tier\n\
                  guarded by per-role permissions.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a config.",
    after_help = "EXAMPLES:\n    \
                  portal-server init                # Scaffold portal.toml and .env.example\n    \
                  portal-server                     # Start the server (requires portal.toml)\n    \
                  portal-server --config my.toml    # Use a custom config file\n    \
                  portal-server config --validate   # Check the config without serving"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "portal.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold portal.toml, .env.example and a data directory
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "3001")]
        port: u16,

        /// Collections to serve (comma separated)
        #[arg(long, value_delimiter = ',', default_value = "food,clothes")]
        collections: Vec<String>,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration file and exit
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
