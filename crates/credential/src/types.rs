//! The credential record and its wire form.

use std::{fmt, str::FromStr};

use bitcoin::bip32::Xpub;
use hdcred_primitives::{errors::ValidationError, hash::sha256};
use secp256k1::{schnorr::Signature, PublicKey, XOnlyPublicKey};
use serde::{Deserialize, Serialize};

/// Size of the fixed-width prefix of the wire form: `id(32) ‖ pub(33) ‖ sig(64)`.
pub const CREDENTIAL_PREFIX_SIZE: usize = 32 + 33 + 64;

/// Identifier binding a credential to its issuer and the parent extended key it was issued
/// against: `SHA256(issuer_pub(33) ‖ parent_xpub(78))`.
pub fn credential_id(issuer_pub: &PublicKey, parent_xpub: &Xpub) -> [u8; 32] {
    sha256(&[&issuer_pub.serialize(), &parent_xpub.encode()])
}

/// Message a credential signs: `SHA256(id ‖ child_xpub(78))`.
pub fn credential_message(id: &[u8; 32], child_xpub: &Xpub) -> [u8; 32] {
    sha256(&[id, &child_xpub.encode()])
}

/// A delegated one-time key bound to one node of a counterpart's wallet.
///
/// Anyone can verify it. Only the holder of the private key behind `xpub` can claim its secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CredentialRepr", into = "CredentialRepr")]
pub struct Credential {
    /// Identifier.
    pub id: [u8; 32],

    /// Credential public key.
    pub pubkey: PublicKey,

    /// Signature over [`Credential::message`] by the credential key.
    pub sig: Signature,

    /// The counterpart's child extended key this credential is bound to.
    pub xpub: Xpub,
}

impl Credential {
    /// The signed message.
    pub fn message(&self) -> [u8; 32] {
        credential_message(&self.id, &self.xpub)
    }

    /// X-only form of the credential key.
    pub fn x_only_pubkey(&self) -> XOnlyPublicKey {
        self.pubkey.x_only_public_key().0
    }

    /// Child index of the bound wallet node.
    pub fn index(&self) -> u32 {
        u32::from(self.xpub.child_number)
    }

    /// Serializes to `id(32) ‖ pub(33) ‖ sig(64) ‖ xpub(base58 string)`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let xpub = self.xpub.to_string();
        let mut bytes = Vec::with_capacity(CREDENTIAL_PREFIX_SIZE + xpub.len());
        bytes.extend_from_slice(&self.id);
        bytes.extend_from_slice(&self.pubkey.serialize());
        bytes.extend_from_slice(&self.sig.serialize());
        bytes.extend_from_slice(xpub.as_bytes());
        bytes
    }

    /// Parses the wire form produced by [`Credential::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        if bytes.len() <= CREDENTIAL_PREFIX_SIZE {
            return Err(ValidationError::InvalidLength {
                expected: CREDENTIAL_PREFIX_SIZE + 1,
                actual: bytes.len(),
            });
        }

        let (id, rest) = bytes.split_at(32);
        let (pubkey, rest) = rest.split_at(33);
        let (sig, xpub) = rest.split_at(64);

        let xpub = std::str::from_utf8(xpub)
            .map_err(|e| ValidationError::MalformedExtendedKey(e.to_string()))?;

        Ok(Self {
            id: id.try_into().map_err(|_| ValidationError::InvalidLength {
                expected: 32,
                actual: id.len(),
            })?,
            pubkey: PublicKey::from_slice(pubkey).map_err(|_| ValidationError::InvalidPoint)?,
            sig: Signature::from_slice(sig).map_err(|_| ValidationError::InvalidLength {
                expected: 64,
                actual: sig.len(),
            })?,
            xpub: Xpub::from_str(xpub)
                .map_err(|e| ValidationError::MalformedExtendedKey(e.to_string()))?,
        })
    }

    /// Hex encoding of the wire form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parses the hex encoding of the wire form.
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        let bytes =
            hex::decode(s.trim()).map_err(|e| ValidationError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Credential {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// JSON shape of a credential: hex fields plus the base58 extended key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialRepr {
    id: String,
    #[serde(rename = "pub")]
    pubkey: String,
    sig: String,
    xpub: String,
}

impl From<Credential> for CredentialRepr {
    fn from(value: Credential) -> Self {
        Self {
            id: hex::encode(value.id),
            pubkey: hex::encode(value.pubkey.serialize()),
            sig: hex::encode(value.sig.serialize()),
            xpub: value.xpub.to_string(),
        }
    }
}

impl TryFrom<CredentialRepr> for Credential {
    type Error = ValidationError;

    fn try_from(value: CredentialRepr) -> Result<Self, Self::Error> {
        let decode =
            |s: &str| hex::decode(s).map_err(|e| ValidationError::InvalidHex(e.to_string()));

        let id = decode(&value.id)?;
        let pubkey = decode(&value.pubkey)?;
        let sig = decode(&value.sig)?;

        Ok(Self {
            id: id.as_slice().try_into().map_err(|_| ValidationError::InvalidLength {
                expected: 32,
                actual: id.len(),
            })?,
            pubkey: PublicKey::from_slice(&pubkey).map_err(|_| ValidationError::InvalidPoint)?,
            sig: Signature::from_slice(&sig).map_err(|_| ValidationError::InvalidLength {
                expected: 64,
                actual: sig.len(),
            })?,
            xpub: Xpub::from_str(&value.xpub)
                .map_err(|e| ValidationError::MalformedExtendedKey(e.to_string()))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use hdcred_test_utils::prelude::*;

    use super::*;
    use crate::issue::gen_credential;

    fn credential() -> Credential {
        gen_credential(9, &issuer_keypair(40), &counterpart_xpub(41)).unwrap()
    }

    #[test]
    fn wire_form_round_trips() {
        let cred = credential();

        let bytes = cred.to_bytes();
        assert_eq!(&bytes[..32], &cred.id);
        assert_eq!(bytes.len(), CREDENTIAL_PREFIX_SIZE + cred.xpub.to_string().len());
        assert_eq!(Credential::from_bytes(&bytes).unwrap(), cred);

        let hex = cred.to_string();
        assert_eq!(hex.parse::<Credential>().unwrap(), cred);
    }

    #[test]
    fn json_uses_hex_fields() {
        let cred = credential();
        let json = serde_json::to_value(cred).unwrap();

        assert_eq!(json["id"], hex::encode(cred.id));
        assert_eq!(json["pub"], hex::encode(cred.pubkey.serialize()));
        assert_eq!(json["xpub"], cred.xpub.to_string());
        assert_eq!(serde_json::from_value::<Credential>(json).unwrap(), cred);
    }

    #[test]
    fn rejects_truncated_input() {
        let bytes = credential().to_bytes();
        assert!(matches!(
            Credential::from_bytes(&bytes[..CREDENTIAL_PREFIX_SIZE]),
            Err(ValidationError::InvalidLength { .. })
        ));
        assert!(matches!(
            Credential::from_bytes(&bytes[..bytes.len() - 1]),
            Err(ValidationError::MalformedExtendedKey(_))
        ));
        assert!(matches!(
            Credential::from_hex("zz"),
            Err(ValidationError::InvalidHex(_))
        ));
    }
}
