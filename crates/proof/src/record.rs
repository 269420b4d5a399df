//! Proof records: creation and verification.

use chrono::Utc;
use hdcred_primitives::hash::sha256;
use hdcred_signer::{verify_signature, Signer};
use secp256k1::{schnorr::Signature, XOnlyPublicKey};
use serde_json::json;
use tracing::{debug, warn};

use crate::{errors::ProofError, policy::ProofPolicy, tags::Tags};

/// Kind assigned to proofs unless the caller picks another.
pub const DEFAULT_KIND: u32 = 20000;

/// Parameters of a new proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofOptions {
    /// Record kind.
    pub kind: u32,

    /// Creation time, in seconds since the Unix epoch.
    pub created_at: u32,

    /// Policy tags.
    pub tags: Tags,
}

impl ProofOptions {
    /// Default kind, no tags, stamped with the current time.
    pub fn now() -> Self {
        let now = Utc::now().timestamp().clamp(0, i64::from(u32::MAX));
        Self::at(u32::try_from(now).unwrap_or(u32::MAX))
    }

    /// Default kind, no tags, stamped with `created_at`.
    pub const fn at(created_at: u32) -> Self {
        Self {
            kind: DEFAULT_KIND,
            created_at,
            tags: Tags::new(),
        }
    }

    /// Sets the kind.
    pub const fn with_kind(mut self, kind: u32) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the tags.
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }
}

/// Identifier of a proof: SHA-256 of the JSON pre-image
/// `[0, pubkey_hex, created_at, kind, tags, content]`.
pub fn proof_id(
    content: &str,
    pubkey: &XOnlyPublicKey,
    created_at: u32,
    kind: u32,
    tags: &Tags,
) -> [u8; 32] {
    let image = json!([0, pubkey.to_string(), created_at, kind, tags, content]);
    sha256(&[image.to_string().as_bytes()])
}

/// A signed commitment to some content, its signer, creation time, kind and tags.
///
/// The content itself is not stored; it must be presented again to verify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofRecord {
    /// Record kind.
    pub kind: u32,

    /// Creation time, in seconds since the Unix epoch.
    pub created_at: u32,

    /// Signer's x-only public key.
    pub pubkey: XOnlyPublicKey,

    /// Hash of the pre-image.
    pub id: [u8; 32],

    /// Signature over `id`.
    pub sig: Signature,

    /// Policy tags.
    pub tags: Tags,
}

impl ProofRecord {
    /// Notarizes `content` with `signer`.
    pub fn create(
        content: &str,
        signer: &Signer,
        options: ProofOptions,
    ) -> Result<Self, ProofError> {
        let ProofOptions {
            kind,
            created_at,
            tags,
        } = options;

        let pubkey = signer.x_only_pubkey();
        let id = proof_id(content, &pubkey, created_at, kind, &tags);
        let sig = signer.sign(&id)?;

        debug!(id = %hex::encode(id), %kind, %created_at, "created proof");
        Ok(Self {
            kind,
            created_at,
            pubkey,
            id,
            sig,
            tags,
        })
    }

    /// Verifies the record against `content` and `policy`.
    ///
    /// Checks run in order: identifier, window start, window end, then signature.
    pub fn verify(&self, content: &str, policy: &ProofPolicy) -> Result<(), ProofError> {
        let result = self.check(content, policy);
        if let Err(e) = &result {
            warn!(id = %hex::encode(self.id), %e, "proof rejected");
        }
        result
    }

    fn check(&self, content: &str, policy: &ProofPolicy) -> Result<(), ProofError> {
        let id = proof_id(
            content,
            &self.pubkey,
            self.created_at,
            self.kind,
            &self.tags,
        );
        if id != self.id {
            return Err(ProofError::IdMismatch);
        }

        policy.check(self.created_at)?;

        verify_signature(&self.sig, &self.id, &self.pubkey)
            .map_err(|_| ProofError::InvalidSignature)
    }
}
