//! Errors raised by credential issuance, verification and claims.

use std::fmt;

use hdcred_key_deriv::WalletError;
use hdcred_primitives::errors::{CryptoError, ValidationError};
use hdcred_signer::SignerError;
use thiserror::Error;

/// The verification check a credential failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCheck {
    /// The identifier does not match the issuer key and parent extended key.
    Id,

    /// The credential's extended key is not a child of the parent extended key.
    Chain,

    /// The signature does not verify against the credential key.
    Signature,
}

impl fmt::Display for CredentialCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Id => "id",
            Self::Chain => "chain",
            Self::Signature => "signature",
        })
    }
}

/// Error type for credential operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The caller supplied malformed input.
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),

    /// The credential failed a verification check.
    #[error("invalid credential: {0} check failed")]
    Invalid(CredentialCheck),

    /// The recovered secret does not match the credential key.
    ///
    /// This almost always means the wrong counterpart key was supplied.
    #[error("recovered key does not match the credential")]
    RecoveryMismatch,

    /// A cryptographic operation failed.
    #[error("crypto: {0}")]
    Crypto(#[from] CryptoError),

    /// Deriving the counterpart's child key failed.
    #[error("derivation: {0}")]
    Derivation(#[from] WalletError),

    /// Signing the credential failed.
    #[error("signing: {0}")]
    Signing(#[from] SignerError),
}
