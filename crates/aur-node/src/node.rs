//! Node commands

use crate::config::NodeConfig;
use anyhow::{Context, Result};
use aur_crypto::{decode_address, encode_address, Keypair};
use aur_ledger::{Ledger, LedgerEvent};
use aur_primitives::PublicKey;
use aur_storage::StateStore;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// Open the store and ledger described by `config`
pub fn open_ledger(config: &NodeConfig) -> Result<Ledger> {
    let store_config = config.store_config();
    let store = StateStore::open(&store_config)
        .with_context(|| format!("opening store at {}", store_config.path.display()))?;
    Ok(Ledger::open(Arc::new(store), config.ledger.clone())?)
}

/// Open the ledger, bootstrap genesis and log lifecycle events
pub async fn start(config: &NodeConfig) -> Result<Ledger> {
    let ledger = open_ledger(config)?;
    ledger.subscribe(log_event);
    let result = ledger.bootstrap_genesis().await?;
    info!(result = %result, "genesis bootstrap");
    Ok(ledger)
}

/// Run until Ctrl-C
pub async fn run(config: NodeConfig) -> Result<()> {
    let ledger = start(&config).await?;
    info!(
        port = config.network.port,
        peers = ?config.network.default_peers,
        representatives = config.representatives.len(),
        "ledger ready"
    );

    tokio::signal::ctrl_c().await.context("waiting for shutdown signal")?;
    info!("Shutdown signal received");
    ledger.shutdown();
    Ok(())
}

fn log_event(event: &LedgerEvent) {
    match event {
        LedgerEvent::BlockInserted { hash, .. } => debug!(hash = %hash, "block inserted"),
        LedgerEvent::AccountState { account, state } => debug!(
            account = %encode_address(account),
            balance = %state.balance,
            head = %state.head,
            "account state"
        ),
        LedgerEvent::Pending(pending) => debug!(
            recipient = %encode_address(&pending.recipient),
            send_hash = %pending.send_hash,
            amount = %pending.amount,
            "pending transfer"
        ),
    }
}

/// Every account as JSON values
pub fn accounts(config: &NodeConfig) -> Result<Vec<serde_json::Value>> {
    let ledger = open_ledger(config)?;
    let accounts = ledger
        .list_accounts()?
        .into_iter()
        .map(|(account, state)| {
            json!({
                "address": encode_address(&account),
                "balance": state.balance.to_string(),
                "head": state.head,
            })
        })
        .collect();
    ledger.shutdown();
    Ok(accounts)
}

/// Pending transfers owed to `address`, as JSON values
pub fn pending(config: &NodeConfig, address: &str, limit: usize) -> Result<Vec<serde_json::Value>> {
    let recipient = decode_address(address).with_context(|| format!("invalid address {}", address))?;
    let ledger = open_ledger(config)?;
    let pending = ledger
        .get_pending(&recipient, limit)?
        .into_iter()
        .map(|p| {
            json!({
                "sendHash": p.send_hash,
                "amount": p.amount.to_string(),
            })
        })
        .collect();
    ledger.shutdown();
    Ok(pending)
}

/// Fresh random keypair
pub fn keygen() -> serde_json::Value {
    let keypair = Keypair::random();
    json!({
        "seed": hex::encode(keypair.seed()),
        "publicKey": keypair.public_key(),
        "address": encode_address(&keypair.public_key()),
    })
}

/// Address for a hex public key
pub fn address(public_key: &str) -> Result<String> {
    let key = PublicKey::from_hex(public_key).with_context(|| format!("invalid public key {}", public_key))?;
    Ok(encode_address(&key))
}
