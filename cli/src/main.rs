// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # MOAC Keyring CLI
//!
//! Entry point for the `moac-keyring` binary. Parses arguments, initializes
//! logging, loads keys into an in-memory keyring, and runs one command.
//!
//! - `new`: generate accounts
//! - `accounts`: list configured accounts
//! - `sign-tx`: sign a JSON transaction request
//! - `sign-message`: sign a raw 32-byte digest
//! - `personal-sign`: sign a prefixed personal message
//! - `verify`: recover signer and chain id from signed bytes
//! - `version`: print build version information

mod cli;
mod logging;

use std::io::Read;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{json, Value};

use moac_keyring::config::{network_name, KEYRING_TYPE};
use moac_keyring::crypto::keys::format_address;
use moac_keyring::transaction::recover_signer;
use moac_keyring::{Keyring, TransactionRequest};

use cli::{Commands, KeyArgs, KeyringCli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = KeyringCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format)?;

    let output = match cli.command {
        Commands::New(args) => new_accounts(args)?,
        Commands::Accounts(args) => list_accounts(args)?,
        Commands::SignTx(args) => sign_transaction(args).await?,
        Commands::SignMessage(args) => sign_message(args)?,
        Commands::PersonalSign(args) => personal_sign(args)?,
        Commands::Verify(args) => verify(args)?,
        Commands::Version => version(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Builds a keyring from the configured keys, refusing to run without any.
fn load_keyring(args: &KeyArgs) -> Result<Keyring> {
    if args.keys.is_empty() {
        bail!("no keys configured; pass --key or set MOAC_KEYRING_KEYS");
    }
    let keyring = Keyring::from_keys(&args.keys).context("failed to import keys")?;
    tracing::info!(accounts = keyring.len(), "keyring loaded");
    Ok(keyring)
}

fn new_accounts(args: cli::NewArgs) -> Result<Value> {
    let keyring = Keyring::new();
    let addresses = keyring.add_accounts(args.count);
    let keys = keyring.export_keys();

    let accounts: Vec<Value> = addresses
        .iter()
        .zip(keys)
        .map(|(address, key)| {
            json!({
                "address": format_address(address),
                "privateKey": format!("0x{}", key),
            })
        })
        .collect();
    Ok(json!({ "type": KEYRING_TYPE, "accounts": accounts }))
}

fn list_accounts(args: KeyArgs) -> Result<Value> {
    let keyring = load_keyring(&args)?;
    let accounts: Vec<String> = keyring.list_accounts().iter().map(format_address).collect();
    Ok(json!({ "type": KEYRING_TYPE, "accounts": accounts }))
}

async fn sign_transaction(args: cli::SignTxArgs) -> Result<Value> {
    let keyring = Arc::new(load_keyring(&args.keys)?);

    let body = if args.tx.as_os_str() == "-" {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("failed to read transaction from stdin")?;
        body
    } else {
        std::fs::read_to_string(&args.tx)
            .with_context(|| format!("failed to read {}", args.tx.display()))?
    };
    let request: TransactionRequest =
        serde_json::from_str(&body).context("transaction request is not valid JSON")?;

    let from = match args.from.or_else(|| request.from.clone()) {
        Some(from) => from,
        None => bail!("no signing account; pass --from or set `from` in the request"),
    };

    let signed = Arc::clone(&keyring)
        .sign_transaction_offloaded(from.clone(), request)
        .await
        .with_context(|| format!("failed to sign transaction for {}", from))?;

    Ok(json!({
        "from": from,
        "rawTransaction": signed.to_hex(),
        "hash": signed.hash().to_string(),
    }))
}

fn sign_message(args: cli::SignMessageArgs) -> Result<Value> {
    let keyring = load_keyring(&args.keys)?;
    let digest = hex::decode(args.digest.trim_start_matches("0x"))
        .context("digest is not valid hex")?;
    let signature = keyring
        .sign_message(&args.from, &digest)
        .with_context(|| format!("failed to sign digest for {}", args.from))?;
    Ok(json!({ "from": args.from, "signature": signature.to_rpc_hex() }))
}

fn personal_sign(args: cli::PersonalSignArgs) -> Result<Value> {
    let keyring = load_keyring(&args.keys)?;
    let message = if args.hex {
        hex::decode(args.message.trim_start_matches("0x")).context("message is not valid hex")?
    } else {
        args.message.into_bytes()
    };
    let signature = keyring
        .sign_personal_message(&args.from, &message)
        .with_context(|| format!("failed to sign message for {}", args.from))?;
    Ok(json!({ "from": args.from, "signature": signature.to_rpc_hex() }))
}

fn verify(args: cli::VerifyArgs) -> Result<Value> {
    let raw = hex::decode(args.raw.trim().trim_start_matches("0x"))
        .context("signed transaction is not valid hex")?;
    let recovered = recover_signer(&raw).context("failed to recover signer")?;
    Ok(json!({
        "from": format_address(&recovered.address),
        "chainId": recovered.chain_id,
        "network": network_name(recovered.chain_id),
    }))
}

fn version() -> Value {
    json!({
        "name": "moac-keyring",
        "version": env!("CARGO_PKG_VERSION"),
        "keyringType": KEYRING_TYPE,
    })
}
