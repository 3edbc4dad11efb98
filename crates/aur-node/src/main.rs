//! Aurium node binary
//!
//! Opens the ledger, bootstraps genesis and serves until Ctrl-C. The
//! remaining subcommands inspect the store or work with keys offline.

mod cli;
mod config;
mod node;

use anyhow::Result;
use cli::{Cli, Command};
use config::NodeConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    if cli.log_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry().with(fmt::layer()).with(filter).init();
    }

    match cli.command() {
        Command::Keygen => println!("{}", node::keygen()),
        Command::Address { public_key } => println!("{}", node::address(&public_key)?),
        command => {
            let config = NodeConfig::from_cli(&cli)?;
            match command {
                Command::Accounts => {
                    for account in node::accounts(&config)? {
                        println!("{}", account);
                    }
                }
                Command::Pending { address, limit } => {
                    for pending in node::pending(&config, &address, limit)? {
                        println!("{}", pending);
                    }
                }
                _ => {
                    tracing::info!(datadir = %config.datadir.display(), "Aurium node starting...");
                    node::run(config).await?;
                }
            }
        }
    }

    Ok(())
}
