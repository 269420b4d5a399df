//! Errors raised while creating, parsing or verifying proofs.

use hdcred_signer::SignerError;
use thiserror::Error;

/// A creation time outside the accepted window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    /// Created before the window opens.
    #[error("created at {created_at}, before {since}")]
    TooEarly {
        /// Record timestamp.
        created_at: u32,
        /// Window start.
        since: u32,
    },

    /// Created after the window closes.
    #[error("created at {created_at}, after {until}")]
    TooLate {
        /// Record timestamp.
        created_at: u32,
        /// Window end.
        until: u32,
    },
}

/// Error type for proof operations.
#[derive(Debug, Error)]
pub enum ProofError {
    /// The recomputed hash differs from the record identifier.
    #[error("proof hash does not match the proof id")]
    IdMismatch,

    /// The record falls outside the policy window.
    #[error("policy: {0}")]
    Policy(#[from] PolicyViolation),

    /// The signature does not verify against the record identifier.
    #[error("proof signature is invalid")]
    InvalidSignature,

    /// The token or note could not be decoded.
    #[error("malformed proof: {0}")]
    Malformed(String),

    /// Signing the identifier failed.
    #[error("signing: {0}")]
    Sign(#[from] SignerError),
}
