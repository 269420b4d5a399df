//! Nostr-style event form of a proof.

use secp256k1::{schnorr::Signature, XOnlyPublicKey};
use serde::{Deserialize, Serialize};

use crate::{errors::ProofError, policy::ProofPolicy, record::ProofRecord, tags::Tags};

/// A proof published together with its content, in the shape of a signed Nostr event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedNote {
    /// Hex proof identifier.
    pub id: String,

    /// Hex x-only public key of the signer.
    pub pubkey: String,

    /// Creation time, in seconds since the Unix epoch.
    pub created_at: u32,

    /// Record kind.
    pub kind: u32,

    /// Policy tags.
    pub tags: Tags,

    /// The notarized content.
    pub content: String,

    /// Hex signature over `id`.
    pub sig: String,
}

impl ProofRecord {
    /// Publishes the record together with `content` as a [`SignedNote`].
    pub fn to_note(&self, content: &str) -> SignedNote {
        SignedNote {
            id: hex::encode(self.id),
            pubkey: self.pubkey.to_string(),
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags.clone(),
            content: content.to_string(),
            sig: hex::encode(self.sig.serialize()),
        }
    }
}

impl SignedNote {
    /// Recovers the record the note was published from.
    pub fn to_record(&self) -> Result<ProofRecord, ProofError> {
        let id = hex::decode(&self.id).map_err(|e| ProofError::Malformed(format!("id: {e}")))?;
        let pubkey =
            hex::decode(&self.pubkey).map_err(|e| ProofError::Malformed(format!("pubkey: {e}")))?;
        let sig = hex::decode(&self.sig).map_err(|e| ProofError::Malformed(format!("sig: {e}")))?;

        Ok(ProofRecord {
            kind: self.kind,
            created_at: self.created_at,
            pubkey: XOnlyPublicKey::from_slice(&pubkey)
                .map_err(|e| ProofError::Malformed(format!("pubkey: {e}")))?,
            id: id
                .as_slice()
                .try_into()
                .map_err(|_| ProofError::Malformed(format!("id is {} bytes", id.len())))?,
            sig: Signature::from_slice(&sig)
                .map_err(|e| ProofError::Malformed(format!("sig: {e}")))?,
            tags: self.tags.clone(),
        })
    }

    /// Verifies the note against its own content.
    pub fn verify(&self, policy: &ProofPolicy) -> Result<(), ProofError> {
        self.to_record()?.verify(&self.content, policy)
    }
}

#[cfg(test)]
mod tests {
    use hdcred_test_utils::prelude::*;

    use super::*;
    use crate::record::ProofOptions;

    fn note() -> SignedNote {
        let options = ProofOptions::at(1_700_000_000).with_tags(Tags::new().with("k", "v"));
        let record = ProofRecord::create("{\"a\":1}", &issuer_signer(5), options).unwrap();
        record.to_note("{\"a\":1}")
    }

    #[test]
    fn note_verifies() {
        let note = note();
        note.verify(&ProofPolicy::any()).unwrap();

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["kind"], 20000);
        assert_eq!(json["tags"], serde_json::json!([["k", "v"]]));
        assert_eq!(serde_json::from_value::<SignedNote>(json).unwrap(), note);
    }

    #[test]
    fn edited_note_is_rejected() {
        let mut note = note();
        note.content = "{\"a\":2}".to_string();
        assert!(matches!(note.verify(&ProofPolicy::any()), Err(ProofError::IdMismatch)));

        let mut note = self::note();
        note.sig = "00".repeat(64);
        assert!(matches!(
            note.verify(&ProofPolicy::any()),
            Err(ProofError::Malformed(_) | ProofError::InvalidSignature)
        ));

        let mut note = self::note();
        note.id = "zz".to_string();
        assert!(matches!(note.verify(&ProofPolicy::any()), Err(ProofError::Malformed(_))));
    }
}
