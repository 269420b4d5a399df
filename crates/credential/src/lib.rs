//! Delegated one-time credentials bound to a counterpart's wallet node.
//!
//! An issuer derives a credential key from its own secret and signs a message committing to one
//! child of the counterpart's extended key. The signature nonce is fixed to an ECDH point between
//! the credential key and that child, so:
//!
//! - anyone holding the issuer's public key and the parent extended key can [verify] it,
//! - only the holder of the child's private key can [claim] the credential secret.
//!
//! [verify]: verify_credential
//! [claim]: claim_credential

pub mod claim;
pub mod errors;
pub mod issue;
pub mod types;
pub mod verify;

pub use claim::{check_claim, claim_credential, claim_secret};
pub use errors::{CredentialCheck, CredentialError};
pub use issue::gen_credential;
pub use types::{credential_id, credential_message, Credential};
pub use verify::verify_credential;
