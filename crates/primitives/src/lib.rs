//! This crate contains the primitive cryptographic operations that the rest of the workspace is
//! built on: scalar reduction and inversion, point scaling, hashing, HMAC and BIP340 Schnorr
//! signing with an explicit nonce.
//!
//! It is not intended to be used directly by end users, but rather to be used as a dependency by
//! other crates. Also note that this crate lies at the bottom of the crate-hierarchy in this
//! workspace i.e., it does not depend on any other crate in this workspace.

pub mod constants;
pub mod errors;
pub mod hash;
pub mod schnorr;
pub mod secp;
