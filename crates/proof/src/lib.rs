//! Notarized proofs: content committed to under a signed hash, verifiable with only the
//! signer's public key.
//!
//! A [`ProofRecord`] travels either as a compact token string (a fixed 136-byte header in hex
//! plus optional query-encoded tags) or as a Nostr-style [`SignedNote`].

pub mod compact;
pub mod errors;
pub mod note;
pub mod policy;
pub mod record;
pub mod tags;

pub use compact::{validate_token_str, TOKEN_HEADER_SIZE, TOKEN_HEX_LEN};
pub use errors::{PolicyViolation, ProofError};
pub use note::SignedNote;
pub use policy::ProofPolicy;
pub use record::{proof_id, ProofOptions, ProofRecord, DEFAULT_KIND};
pub use tags::Tags;
