//! Errors raised by key identities, extended keys and wallets.

use bitcoin::bip32;
use hdcred_primitives::errors::{CryptoError, ValidationError};
use thiserror::Error;

/// Error type for key and wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The caller supplied malformed input.
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),

    /// A cryptographic operation failed.
    #[error("crypto: {0}")]
    Crypto(#[from] CryptoError),

    /// BIP32 derivation failed.
    #[error("BIP32 derivation error: {0}")]
    Bip32(#[from] bip32::Error),
}
