use std::path::PathBuf;

use bitcoin::Network;
use clap::{Parser, Subcommand};
use hdcred_key_deriv::AddressFormat;

#[derive(Parser)]
#[command(
    name = "hdcred-cli",
    about = "Derive keys, issue and claim credentials, notarize content",
    version
)]
pub(crate) struct Cli {
    #[arg(long, global = true, env = "HDCRED_CONFIG", help = "path to a TOML config file")]
    pub(crate) config: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Commands {
    DeriveKeys(DeriveKeysArgs),

    Address(AddressArgs),

    Issue(IssueArgs),

    VerifyCred(VerifyCredArgs),

    Claim(ClaimArgs),

    Notarize(NotarizeArgs),

    VerifyToken(VerifyTokenArgs),
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Derive the identity, account key and first address of a seed", version)]
pub(crate) struct DeriveKeysArgs {
    #[arg(long, env = "HDCRED_SEED", help = "32-byte seed, hex")]
    pub(crate) seed: String,

    #[arg(long, help = "network to derive for, overrides the config file")]
    pub(crate) network: Option<Network>,

    #[arg(long, help = "address format, overrides the config file")]
    pub(crate) format: Option<AddressFormat>,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Derive the address of one child of an extended key", version)]
pub(crate) struct AddressArgs {
    #[arg(long, help = "extended key, public or private")]
    pub(crate) xpub: String,

    #[arg(long, default_value_t = 0, help = "child index")]
    pub(crate) index: u32,

    #[arg(long, help = "address format, overrides the config file")]
    pub(crate) format: Option<AddressFormat>,

    #[arg(long, help = "check whether this address belongs to the key instead")]
    pub(crate) check: Option<String>,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Issue a credential against a counterpart's extended key", version)]
pub(crate) struct IssueArgs {
    #[arg(long, env = "HDCRED_SECRET", help = "issuer secret key, hex")]
    pub(crate) secret: String,

    #[arg(long, help = "counterpart's parent extended public key")]
    pub(crate) xpub: String,

    #[arg(long, help = "child index the credential is bound to")]
    pub(crate) index: u32,

    #[arg(long, help = "print JSON instead of the hex wire form")]
    pub(crate) json: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Verify a credential", version)]
pub(crate) struct VerifyCredArgs {
    #[arg(long, help = "credential, hex wire form")]
    pub(crate) credential: String,

    #[arg(long, help = "issuer public key, hex")]
    pub(crate) issuer: String,

    #[arg(long, help = "counterpart's parent extended public key")]
    pub(crate) xpub: String,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Recover a credential's key with the counterpart's private key", version)]
pub(crate) struct ClaimArgs {
    #[arg(long, help = "credential, hex wire form")]
    pub(crate) credential: String,

    #[arg(long, env = "HDCRED_XPRV", help = "counterpart's parent extended private key")]
    pub(crate) xprv: String,

    #[arg(long, help = "also print the recovered secret key")]
    pub(crate) reveal: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Notarize content into a proof token", version)]
pub(crate) struct NotarizeArgs {
    #[arg(long, env = "HDCRED_SECRET", help = "signer secret key, hex")]
    pub(crate) secret: String,

    #[arg(long, help = "content to notarize")]
    pub(crate) content: String,

    #[arg(long = "tag", value_parser = parse_tag, help = "policy tag as label=value, repeatable")]
    pub(crate) tags: Vec<(String, String)>,

    #[arg(long, help = "record kind")]
    pub(crate) kind: Option<u32>,

    #[arg(long, help = "creation time in unix seconds, defaults to now")]
    pub(crate) created_at: Option<u32>,

    #[arg(long, help = "print the signed note JSON instead of the token")]
    pub(crate) note: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Verify a proof token against its content", version)]
pub(crate) struct VerifyTokenArgs {
    #[arg(long, help = "notarized content")]
    pub(crate) content: String,

    #[arg(long, help = "proof token")]
    pub(crate) token: String,

    #[arg(long, help = "earliest accepted creation time, overrides the config file")]
    pub(crate) since: Option<u32>,

    #[arg(long, help = "latest accepted creation time, overrides the config file")]
    pub(crate) until: Option<u32>,
}

fn parse_tag(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(label, value)| (label.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected label=value, got {s}"))
}
