//! Key pair, signer and wallet fixtures.

use bitcoin::{
    bip32::{Xpriv, Xpub},
    Network,
};
use hdcred_key_deriv::{KeyPair, MasterWallet};
use hdcred_signer::{Signer, SignerConfig};

use crate::rng::{seeded_bytes, seeded_rng};

/// A flat key pair generated from `seed`.
pub fn issuer_keypair(seed: u64) -> KeyPair {
    KeyPair::generate(&mut seeded_rng(seed))
}

/// A signer over [`issuer_keypair`] with the default configuration.
pub fn issuer_signer(seed: u64) -> Signer {
    Signer::new(issuer_keypair(seed), SignerConfig::default())
}

/// A mainnet master wallet built from a 32-byte seed drawn from `seed`.
pub fn counterpart_master(seed: u64) -> MasterWallet {
    counterpart_master_on(seed, Network::Bitcoin)
}

/// Same as [`counterpart_master`], on `network`.
pub fn counterpart_master_on(seed: u64, network: Network) -> MasterWallet {
    MasterWallet::from_seed(&seeded_bytes::<32>(seed), network)
        .expect("32-byte seeds are always accepted")
}

/// Private account root of [`counterpart_master`].
pub fn counterpart_xpriv(seed: u64) -> Xpriv {
    *counterpart_master(seed)
        .wallet()
        .key()
        .xprv()
        .expect("master wallets hold private keys")
}

/// Public account root of [`counterpart_master`].
pub fn counterpart_xpub(seed: u64) -> Xpub {
    *counterpart_master(seed).wallet().key().xpub()
}
