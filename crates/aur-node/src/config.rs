//! Configuration types for aurium-node

use crate::cli::Cli;
use aur_crypto::decode_address;
use aur_ledger::LedgerConfig;
use aur_storage::StoreConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Highest valid port
const MAX_PORT: u32 = 65535;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("reading {path}: {source}")]
    Io {
        /// Config file
        path: PathBuf,
        /// Cause
        source: std::io::Error,
    },

    /// File is not valid JSON for [`NodeConfig`]
    #[error("parsing {path}: {source}")]
    Json {
        /// Config file
        path: PathBuf,
        /// Cause
        source: serde_json::Error,
    },

    /// Port outside 0..=65535
    #[error("invalid port {0}, expected 0..=65535")]
    InvalidPort(u32),

    /// Peer is not `host:port`
    #[error("invalid peer {0}")]
    InvalidPeer(String),

    /// Representative is not a valid address
    #[error("invalid representative {address}: {reason}")]
    InvalidRepresentative {
        /// Offending entry
        address: String,
        /// Decode failure
        reason: String,
    },
}

/// Peer transport settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// UDP port, 0 = no binding
    pub port: u32,
    /// Peers contacted at startup
    pub default_peers: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            port: 7145,
            default_peers: vec!["127.0.0.1:8081".to_string()],
        }
    }
}

/// Node configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Data directory
    pub datadir: PathBuf,
    /// Store settings; a relative path is resolved against `datadir`
    pub store: StoreConfig,
    /// Ledger settings
    pub ledger: LedgerConfig,
    /// Peer transport settings
    pub network: NetworkConfig,
    /// Representative addresses
    pub representatives: Vec<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            datadir: PathBuf::from("./data"),
            store: StoreConfig::at("ledger"),
            ledger: LedgerConfig::default(),
            network: NetworkConfig::default(),
            representatives: Vec::new(),
        }
    }
}

impl NodeConfig {
    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build from the CLI: config file if given, then flag overrides, then validation
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(datadir) = &cli.datadir {
            config.datadir = datadir.clone();
        }
        if let Some(port) = cli.port {
            config.network.port = port;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check port, peers and representatives
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.port > MAX_PORT {
            return Err(ConfigError::InvalidPort(self.network.port));
        }
        for peer in &self.network.default_peers {
            peer.parse::<SocketAddr>()
                .map_err(|_| ConfigError::InvalidPeer(peer.clone()))?;
        }
        for address in &self.representatives {
            decode_address(address).map_err(|e| ConfigError::InvalidRepresentative {
                address: address.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Store config with its path resolved
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            path: self.datadir.join(&self.store.path),
            ..self.store.clone()
        }
    }
}
