//! CLI argument parsing for aurium-node

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Aurium block-lattice node
#[derive(Parser, Debug, Clone)]
#[command(name = "aurium-node")]
#[command(about = "Aurium block-lattice node")]
#[command(version)]
pub struct Cli {
    /// JSON config file (optional, defaults apply otherwise)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory, overrides the config file
    #[arg(long, global = true)]
    pub datadir: Option<PathBuf>,

    /// Peer port, overrides the config file
    #[arg(long, global = true)]
    pub port: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Command to run (default: run)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Node commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the ledger, bootstrap genesis and run until Ctrl-C
    Run,
    /// Print every account
    Accounts,
    /// Print pending transfers owed to an address
    Pending {
        /// Recipient address
        address: String,
        /// Maximum entries
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },
    /// Generate a random keypair
    Keygen,
    /// Encode a hex public key as an address
    Address {
        /// 32-byte public key in hex
        public_key: String,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Selected command
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}
