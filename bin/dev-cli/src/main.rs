//! Developer CLI for key derivation, credentials and notarized proofs.

mod cli;
mod config;
mod handlers;

use anyhow::{Error, Result};
use clap::Parser;
use hdcred_common::logging::{self, LoggerConfig};

use crate::{
    cli::{Cli, Commands},
    config::CliConfig,
    handlers::{address, credential, derive_keys, proof},
};

fn main() -> Result<(), Error> {
    logging::init(LoggerConfig::with_base_name("hdcred-cli"));

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CliConfig::from_path(path)?,
        None => CliConfig::default(),
    };

    match cli.command {
        Commands::DeriveKeys(args) => derive_keys::handle_derive_keys(args, &config),
        Commands::Address(args) => address::handle_address(args, &config),
        Commands::Issue(args) => credential::handle_issue(args),
        Commands::VerifyCred(args) => credential::handle_verify(args),
        Commands::Claim(args) => credential::handle_claim(args),
        Commands::Notarize(args) => proof::handle_notarize(args),
        Commands::VerifyToken(args) => proof::handle_verify_token(args, &config),
    }
}
