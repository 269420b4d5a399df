//! Derives the identity and wallet of a seed.

use anyhow::Result;
use hdcred_key_deriv::KeyPair;
use serde::Serialize;

use crate::{cli::DeriveKeysArgs, config::CliConfig};

#[derive(Debug, Serialize)]
struct DerivedKeys {
    pubkey: String,
    id: String,
    master_xpub: String,
    master_xprv: Option<String>,
    account_xpub: String,
    first_address: String,
}

/// Handles the derive-keys command.
pub(crate) fn handle_derive_keys(args: DeriveKeysArgs, config: &CliConfig) -> Result<()> {
    let network = args.network.unwrap_or(config.wallet.network);
    let format = args.format.unwrap_or(config.wallet.address_format);

    let seed = hex::decode(&args.seed)?;
    let keypair = KeyPair::from_secret_bytes(&seed)?;
    let master = keypair.master_wallet(network)?;
    let mut account = master.account(0)?;

    let derived = DerivedKeys {
        pubkey: hex::encode(keypair.public_key().serialize()),
        id: hex::encode(keypair.id()),
        master_xpub: master.wallet().key().to_string(),
        master_xprv: master.wallet().key().xprv().map(ToString::to_string),
        account_xpub: account.key().to_string(),
        first_address: account.get_address(0, format)?,
    };

    println!("{}", serde_json::to_string_pretty(&derived)?);
    Ok(())
}
