//! Credential issuance.

use bitcoin::bip32::Xpub;
use hdcred_key_deriv::{ExtendedKey, KeyPair, HARDENED_OFFSET};
use hdcred_primitives::{errors::ValidationError, secp::reduce_scalar};
use hdcred_signer::{Signer, SignerConfig};
use tracing::debug;

use crate::{
    errors::CredentialError,
    types::{credential_id, credential_message, Credential},
};

/// Issues a credential bound to child `index` of `counterpart_xpub`.
///
/// The credential key is `c = reduce(HMAC(issuer_secret, issuer_pub ‖ id ‖ child_xpub))`, so every
/// index gets its own key under the shared `id`. Its signature uses
/// a nonce fixed to `ecdh(c, W)`, where `W` is the counterpart's child key. The holder of the
/// private key behind `W` can rebuild that nonce and so recover `c`. This nonce disclosure is
/// the point of the construction and must not be replaced with a random nonce.
///
/// Only non-hardened indexes can be issued against, since the counterpart key is public.
pub fn gen_credential(
    index: u32,
    issuer: &KeyPair,
    counterpart_xpub: &Xpub,
) -> Result<Credential, CredentialError> {
    if index >= HARDENED_OFFSET {
        return Err(ValidationError::IndexOutOfRange(index).into());
    }

    let child = ExtendedKey::from_xpub(*counterpart_xpub).derive_child(index)?;
    let issuer_pub = issuer.public_key();
    let id = credential_id(&issuer_pub, counterpart_xpub);

    let secret = reduce_scalar(&issuer.hmac(&[
        &issuer_pub.serialize(),
        &id,
        &child.xpub().encode(),
    ]))?;
    let signer = Signer::new(KeyPair::with_id(secret, id), SignerConfig::default());

    let message = credential_message(&id, child.xpub());
    let sig = signer.sign_recoverable(&message, &child.public_key())?;

    debug!(
        id = %hex::encode(id),
        counterpart = %counterpart_xpub.fingerprint(),
        %index,
        "issued credential"
    );

    Ok(Credential {
        id,
        pubkey: signer.pubkey(),
        sig,
        xpub: *child.xpub(),
    })
}

#[cfg(test)]
mod tests {
    use hdcred_test_utils::prelude::*;

    use super::*;
    use crate::verify::verify_credential;

    #[test]
    fn issuance_is_deterministic() {
        let issuer = issuer_keypair(1);
        let parent = counterpart_xpub(2);

        let first = gen_credential(7, &issuer, &parent).unwrap();
        let second = gen_credential(7, &issuer, &parent).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.index(), 7);
        assert_eq!(first.id, credential_id(&issuer.public_key(), &parent));
    }

    #[test]
    fn indexes_share_an_id_but_not_a_key() {
        let issuer = issuer_keypair(3);
        let parent = counterpart_xpub(4);

        let a = gen_credential(0, &issuer, &parent).unwrap();
        let b = gen_credential(1, &issuer, &parent).unwrap();
        assert_eq!(a.id, b.id);
        assert_ne!(a.xpub, b.xpub);
        assert_ne!(a.pubkey, b.pubkey);
        assert_ne!(a.sig, b.sig);
        verify_credential(&b, &issuer.public_key(), &parent).unwrap();
    }

    #[test]
    fn rejects_hardened_indexes() {
        let issuer = issuer_keypair(5);
        let parent = counterpart_xpub(6);

        assert!(matches!(
            gen_credential(HARDENED_OFFSET, &issuer, &parent),
            Err(CredentialError::Validation(ValidationError::IndexOutOfRange(_)))
        ));
        assert!(gen_credential(HARDENED_OFFSET - 1, &issuer, &parent).is_ok());
    }
}
