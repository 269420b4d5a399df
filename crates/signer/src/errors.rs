//! Errors raised by the signer.

use hdcred_primitives::errors::{CryptoError, ValidationError};
use musig2::errors::{KeyAggError, SigningError, VerifyError};
use thiserror::Error;

/// Error type for signing operations.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The caller supplied malformed input, e.g. a message of the wrong size.
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),

    /// A cryptographic operation failed.
    #[error("crypto: {0}")]
    Crypto(#[from] CryptoError),

    /// The public keys could not be aggregated.
    #[error("key aggregation failed: {0}")]
    KeyAgg(#[from] KeyAggError),

    /// Our key is not part of the session, or our partial signature failed self-verification.
    #[error("partial signing failed: {0}")]
    Signing(#[from] SigningError),

    /// A partial or aggregated signature did not verify.
    #[error("musig2 verification failed: {0}")]
    Verify(#[from] VerifyError),
}
