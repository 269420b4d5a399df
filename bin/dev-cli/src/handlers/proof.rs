//! Notarizes content and verifies proof tokens.

use anyhow::Result;
use hdcred_key_deriv::KeyPair;
use hdcred_proof::{validate_token_str, ProofOptions, ProofRecord, Tags};
use hdcred_signer::{Signer, SignerConfig};
use tracing::warn;

use crate::{
    cli::{NotarizeArgs, VerifyTokenArgs},
    config::CliConfig,
};

/// Handles the notarize command.
pub(crate) fn handle_notarize(args: NotarizeArgs) -> Result<()> {
    let keypair = KeyPair::from_secret_bytes(&hex::decode(&args.secret)?)?;
    let signer = Signer::new(keypair, SignerConfig::default());

    let mut options = match args.created_at {
        Some(created_at) => ProofOptions::at(created_at),
        None => ProofOptions::now(),
    }
    .with_tags(Tags::from_pairs(args.tags));
    if let Some(kind) = args.kind {
        options = options.with_kind(kind);
    }

    let record = ProofRecord::create(&args.content, &signer, options)?;
    if args.note {
        println!("{}", serde_json::to_string_pretty(&record.to_note(&args.content))?);
    } else {
        println!("{}", record.encode()?);
    }

    Ok(())
}

/// Handles the verify-token command.
pub(crate) fn handle_verify_token(args: VerifyTokenArgs, config: &CliConfig) -> Result<()> {
    // Escaped tags fall outside the canonical token alphabet but still decode.
    if let Err(e) = validate_token_str(&args.token) {
        warn!(%e, "token is not in canonical form");
    }

    let record = ProofRecord::parse(&args.token)?;

    let mut policy = config.policy;
    if let Some(since) = args.since {
        policy = policy.since(since);
    }
    if let Some(until) = args.until {
        policy = policy.until(until);
    }

    record.verify(&args.content, &policy)?;
    println!("valid");

    Ok(())
}
