//! CLI command definitions for the `chatkeep` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod session;
pub mod user;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Session and conversation store for a chat web service.
#[derive(Parser)]
#[command(name = "chatkeep", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on (overrides config.toml).
        #[arg(short, long, env = "CHATKEEP_PORT")]
        port: Option<u16>,

        /// Host to bind to (overrides config.toml).
        #[arg(long, env = "CHATKEEP_HOST")]
        host: Option<String>,
    },

    /// Create a user account.
    Register {
        /// Username for the new account.
        username: String,

        /// Password (prompted for when omitted).
        #[arg(long)]
        password: Option<String>,
    },

    /// Delete sessions whose expiry has passed.
    PurgeSessions,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
