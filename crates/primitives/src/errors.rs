//! Error taxonomy shared across the workspace.
//!
//! [`ValidationError`] covers malformed caller input and is raised before any cryptographic work
//! happens. [`CryptoError`] covers failures of the cryptographic operations themselves.

use thiserror::Error;

/// Malformed input: wrong byte length, out-of-range scalar, malformed key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The input does not have the expected number of bytes.
    #[error("invalid input size: {actual} != {expected}")]
    InvalidLength {
        /// Expected size in bytes.
        expected: usize,
        /// Actual size in bytes.
        actual: usize,
    },

    /// The scalar is zero or not below the curve order.
    #[error("scalar is out of range")]
    ScalarOutOfRange,

    /// The message integer value is below the signing floor.
    #[error("message integer value is too low")]
    MessageBelowFloor,

    /// The bytes do not decode to a point on the curve.
    #[error("invalid curve point encoding")]
    InvalidPoint,

    /// The extended key string or bytes could not be parsed.
    #[error("malformed extended key: {0}")]
    MalformedExtendedKey(String),

    /// A hardened child was requested from a key without private material.
    #[error("hardened index {0} requires a private key")]
    HardenedWithoutPrivate(u32),

    /// The index cannot be used for the requested derivation.
    #[error("index {0} is out of range")]
    IndexOutOfRange(u32),

    /// The address string could not be parsed or is of an unsupported type.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The seed is not accepted by the master key construction.
    #[error("invalid seed length: {0} bytes")]
    InvalidSeedLength(usize),

    /// Hex decoding failed.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl ValidationError {
    /// Asserts that `actual` equals `expected`.
    pub const fn check_len(actual: usize, expected: usize) -> Result<(), Self> {
        if actual == expected {
            Ok(())
        } else {
            Err(Self::InvalidLength { expected, actual })
        }
    }
}

/// Failures of the cryptographic operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The signature does not verify against the message and public key.
    #[error("signature is invalid")]
    InvalidSignature,

    /// The nonce point reproduced from a known nonce does not match the signature.
    #[error("nonce does not match the signature")]
    NonceMismatch,

    /// ECDH was attempted against a point that cannot be scaled.
    #[error("ECDH against an invalid point")]
    InvalidEcdhPoint,

    /// Scalar arithmetic produced zero.
    #[error("scalar arithmetic produced zero")]
    ZeroScalar,

    /// Error from the underlying secp256k1 library.
    #[error("secp256k1: {0}")]
    Secp(#[from] secp256k1::Error),
}
