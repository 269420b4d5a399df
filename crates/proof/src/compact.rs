//! Compact token form of a proof.
//!
//! `kind(4, BE) ‖ created_at(4, BE) ‖ pubkey(32) ‖ id(32) ‖ sig(64)` in hex, optionally followed
//! by the tags as a query string.

use std::str::FromStr;

use secp256k1::{schnorr::Signature, XOnlyPublicKey};

use crate::{errors::ProofError, record::ProofRecord, tags::Tags};

/// Size of the binary token header.
pub const TOKEN_HEADER_SIZE: usize = 4 + 4 + 32 + 32 + 64;

/// Length of the hex-encoded token header.
pub const TOKEN_HEX_LEN: usize = 2 * TOKEN_HEADER_SIZE;

impl ProofRecord {
    /// The binary token header.
    pub fn header(&self) -> [u8; TOKEN_HEADER_SIZE] {
        let mut header = [0u8; TOKEN_HEADER_SIZE];
        header[..4].copy_from_slice(&self.kind.to_be_bytes());
        header[4..8].copy_from_slice(&self.created_at.to_be_bytes());
        header[8..40].copy_from_slice(&self.pubkey.serialize());
        header[40..72].copy_from_slice(&self.id);
        header[72..].copy_from_slice(&self.sig.serialize());
        header
    }

    /// Token string: the hex header followed by the tag query, if any.
    ///
    /// Fails when a tag is not a `[label, value]` pair, since the token could not carry it.
    pub fn encode(&self) -> Result<String, ProofError> {
        Ok(format!("{}{}", hex::encode(self.header()), self.tags.encode_query()?))
    }

    /// Parses a token string produced by [`ProofRecord::encode`].
    pub fn parse(token: &str) -> Result<Self, ProofError> {
        let (header, query) = match token.split_once('?') {
            Some((header, query)) => (header, Some(query)),
            None => (token, None),
        };

        let bytes =
            hex::decode(header).map_err(|e| ProofError::Malformed(format!("header: {e}")))?;
        let header: [u8; TOKEN_HEADER_SIZE] = bytes.as_slice().try_into().map_err(|_| {
            ProofError::Malformed(format!(
                "header is {} bytes, expected {TOKEN_HEADER_SIZE}",
                bytes.len()
            ))
        })?;

        let (kind, rest) = header.split_at(4);
        let (created_at, rest) = rest.split_at(4);
        let (pubkey, rest) = rest.split_at(32);
        let (id, sig) = rest.split_at(32);

        Ok(Self {
            kind: u32::from_be_bytes(fixed(kind)),
            created_at: u32::from_be_bytes(fixed(created_at)),
            pubkey: XOnlyPublicKey::from_slice(pubkey)
                .map_err(|e| ProofError::Malformed(format!("pubkey: {e}")))?,
            id: fixed(id),
            sig: Signature::from_slice(sig)
                .map_err(|e| ProofError::Malformed(format!("signature: {e}")))?,
            tags: query.map(Tags::decode_query).transpose()?.unwrap_or_default(),
        })
    }
}

/// Copies a slice whose length the caller has already fixed.
fn fixed<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

impl FromStr for ProofRecord {
    type Err = ProofError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Checks the shape of a token string without decoding it.
///
/// The header must be exactly [`TOKEN_HEX_LEN`] hex digits. A query, if present, must be one or
/// more `label=value` pairs joined by `&`, each side made of ASCII letters, digits or `_`.
pub fn validate_token_str(token: &str) -> Result<(), ProofError> {
    let (header, query) = match token.split_once('?') {
        Some((header, query)) => (header, Some(query)),
        None => (token, None),
    };

    if header.len() != TOKEN_HEX_LEN || !header.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ProofError::Malformed("invalid token header".to_string()));
    }

    let is_word = |s: &str| {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
    };
    if let Some(query) = query {
        let valid = query.split('&').all(|pair| {
            pair.split_once('=')
                .is_some_and(|(label, value)| is_word(label) && is_word(value))
        });
        if !valid {
            return Err(ProofError::Malformed("invalid token query".to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use hdcred_test_utils::prelude::*;

    use super::*;
    use crate::{policy::ProofPolicy, record::ProofOptions};

    fn notarize(tags: Tags) -> ProofRecord {
        let options = ProofOptions::at(1_700_000_000).with_kind(7).with_tags(tags);
        ProofRecord::create("content", &issuer_signer(3), options).unwrap()
    }

    #[test]
    fn token_round_trip() {
        let record = notarize(Tags::new().with("ref", "inv_42").with("amt", "5000"));
        let token = record.encode().unwrap();

        assert!(token.starts_with("0000000765"));
        assert!(token.ends_with("?ref=inv_42&amt=5000"));
        validate_token_str(&token).unwrap();

        let parsed: ProofRecord = token.parse().unwrap();
        assert_eq!(parsed, record);
        parsed.verify("content", &ProofPolicy::any()).unwrap();
    }

    #[test]
    fn token_without_tags_is_bare_hex() {
        let token = notarize(Tags::new()).encode().unwrap();
        assert_eq!(token.len(), TOKEN_HEX_LEN);
        validate_token_str(&token).unwrap();
        assert!(ProofRecord::parse(&token).unwrap().tags.is_empty());
    }

    #[test]
    fn multi_value_tags_cannot_become_tokens() {
        let tags = Tags::from(vec![vec!["e".to_string(), "a".to_string(), "b".to_string()]]);
        let record = notarize(tags.clone());

        record.verify("content", &ProofPolicy::any()).unwrap();
        assert!(matches!(record.encode(), Err(ProofError::Malformed(_))));

        let note = record.to_note("content");
        note.verify(&ProofPolicy::any()).unwrap();
        assert_eq!(note.tags, tags);
    }

    #[test]
    fn rejects_malformed_tokens() {
        let token = notarize(Tags::new()).encode().unwrap();

        for bad in [
            token[..TOKEN_HEX_LEN - 2].to_string(),
            format!("{token}00"),
            format!("{}zz", &token[..TOKEN_HEX_LEN - 2]),
            format!("{token}?"),
            format!("{token}?a="),
            format!("{token}?a=b&"),
            format!("{token}?a-b=c"),
        ] {
            assert!(
                matches!(validate_token_str(&bad), Err(ProofError::Malformed(_))),
                "accepted {bad}"
            );
        }

        assert!(matches!(
            ProofRecord::parse(&token[..TOKEN_HEX_LEN - 2]),
            Err(ProofError::Malformed(_))
        ));
    }
}
