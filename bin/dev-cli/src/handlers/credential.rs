//! Issues, verifies and claims credentials.

use std::str::FromStr;

use anyhow::Result;
use bitcoin::bip32::{Xpriv, Xpub};
use hdcred_credential::{claim_credential, gen_credential, verify_credential, Credential};
use hdcred_key_deriv::KeyPair;
use secp256k1::PublicKey;
use serde::Serialize;
use tracing::info;

use crate::cli::{ClaimArgs, IssueArgs, VerifyCredArgs};

#[derive(Debug, Serialize)]
struct Claimed {
    pubkey: String,
    id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    secret: Option<String>,
}

/// Handles the issue command.
pub(crate) fn handle_issue(args: IssueArgs) -> Result<()> {
    let issuer = KeyPair::from_secret_bytes(&hex::decode(&args.secret)?)?;
    let xpub = Xpub::from_str(&args.xpub)?;

    let cred = gen_credential(args.index, &issuer, &xpub)?;
    info!(issuer = %issuer.public_key(), index = %args.index, "issued credential");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&cred)?);
    } else {
        println!("{cred}");
    }

    Ok(())
}

/// Handles the verify-cred command.
pub(crate) fn handle_verify(args: VerifyCredArgs) -> Result<()> {
    let cred = Credential::from_hex(&args.credential)?;
    let issuer = PublicKey::from_str(&args.issuer)?;
    let xpub = Xpub::from_str(&args.xpub)?;

    verify_credential(&cred, &issuer, &xpub)?;
    println!("valid");

    Ok(())
}

/// Handles the claim command.
pub(crate) fn handle_claim(args: ClaimArgs) -> Result<()> {
    let cred = Credential::from_hex(&args.credential)?;
    let xprv = Xpriv::from_str(&args.xprv)?;

    let keypair = claim_credential(&cred, &xprv)?;
    let claimed = Claimed {
        pubkey: hex::encode(keypair.public_key().serialize()),
        id: hex::encode(keypair.id()),
        secret: args
            .reveal
            .then(|| hex::encode(keypair.secret_key().secret_bytes())),
    };

    println!("{}", serde_json::to_string_pretty(&claimed)?);
    Ok(())
}
