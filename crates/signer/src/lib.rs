//! Deterministic Schnorr signing and MuSig2 participation over a [`KeyPair`].
//!
//! Ordinary signatures use BIP340 nonces derived from the key and message. The
//! [`Signer::sign_recoverable`] path instead binds the nonce to an ECDH point so that a chosen
//! counterpart can later recover the signing key. That is intentional and is the mechanism
//! credentials are claimed through.
//!
//! [`KeyPair`]: hdcred_key_deriv::KeyPair

pub mod config;
pub mod errors;
pub mod musig;
pub mod nonce;
pub mod signer;

pub use config::SignerConfig;
pub use errors::SignerError;
pub use musig::{MusigSession, MUSIG_AUX_SIZE};
pub use signer::{counterpart_shared_point, recover_secret, verify_signature, Signer};
