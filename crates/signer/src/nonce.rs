//! Deterministic nonce derivation.
//!
//! Two rules live here. [`derive_nonce`] is the BIP340 default used for ordinary signatures.
//! [`shared_nonce`] fixes the nonce to an ECDH point so the counterpart who can rebuild that
//! point can also rebuild the nonce. That second rule is deliberate nonce disclosure: it is what
//! lets a credential's secret be claimed later. Do not randomize it.

use hdcred_primitives::{
    constants::{BIP340_AUX_TAG, BIP340_NONCE_TAG},
    errors::CryptoError,
    hash::tagged_hash,
    secp::{reduce_scalar, xonly_bytes, EvenSecretKey},
};
use secp256k1::{PublicKey, SecretKey, XOnlyPublicKey, SECP256K1};
use zeroize::Zeroize;

/// BIP340 nonce for `message` under `secret`.
///
/// `t = d` without aux randomness, otherwise `t = d XOR H_aux(aux)`. The nonce is
/// `reduce(H_nonce(t ‖ P.x ‖ message))`, with `d` normalized to an even public key.
pub fn derive_nonce(
    secret: &SecretKey,
    message: &[u8],
    aux: Option<&[u8; 32]>,
) -> Result<SecretKey, CryptoError> {
    let d: SecretKey = *EvenSecretKey::from(*secret);
    let (pubkey, _) = d.x_only_public_key(SECP256K1);

    let mut t = d.secret_bytes();
    if let Some(aux) = aux {
        let mask = tagged_hash(BIP340_AUX_TAG, &[aux]);
        t.iter_mut().zip(mask).for_each(|(byte, m)| *byte ^= m);
    }

    let hash = tagged_hash(BIP340_NONCE_TAG, &[&t, &pubkey.serialize(), message]);
    t.zeroize();

    reduce_scalar(&hash).map_err(|_| CryptoError::ZeroScalar)
}

/// Nonce bound to the shared point `shared`: `reduce(H_nonce(N.x ‖ P.x ‖ message))`.
///
/// Anyone holding `shared` recomputes the same nonce.
pub fn shared_nonce(
    shared: &PublicKey,
    pubkey: &XOnlyPublicKey,
    message: &[u8; 32],
) -> Result<SecretKey, CryptoError> {
    let hash = tagged_hash(
        BIP340_NONCE_TAG,
        &[&xonly_bytes(shared), &pubkey.serialize(), message],
    );
    reduce_scalar(&hash).map_err(|_| CryptoError::ZeroScalar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> SecretKey {
        SecretKey::from_slice(&[byte; 32]).unwrap()
    }

    #[test]
    fn nonce_is_deterministic() {
        let msg = [0x55u8; 32];
        assert_eq!(
            derive_nonce(&key(1), &msg, None).unwrap(),
            derive_nonce(&key(1), &msg, None).unwrap()
        );
        assert_eq!(
            derive_nonce(&key(1), &msg, Some(&[9u8; 32])).unwrap(),
            derive_nonce(&key(1), &msg, Some(&[9u8; 32])).unwrap()
        );
    }

    #[test]
    fn nonce_depends_on_every_input() {
        let msg = [0x55u8; 32];
        let base = derive_nonce(&key(1), &msg, None).unwrap();

        assert_ne!(base, derive_nonce(&key(2), &msg, None).unwrap());
        assert_ne!(base, derive_nonce(&key(1), &[0x56u8; 32], None).unwrap());
        assert_ne!(base, derive_nonce(&key(1), &msg, Some(&[0u8; 32])).unwrap());
    }

    #[test]
    fn key_and_its_negation_share_nonces() {
        let msg = [1u8; 32];
        assert_eq!(
            derive_nonce(&key(3), &msg, None).unwrap(),
            derive_nonce(&key(3).negate(), &msg, None).unwrap()
        );
    }

    #[test]
    fn shared_nonce_ignores_the_parity_of_the_shared_point() {
        let shared = PublicKey::from_secret_key(SECP256K1, &key(4));
        let negated = shared.negate(SECP256K1);
        let (pubkey, _) = key(5).x_only_public_key(SECP256K1);
        let msg = [2u8; 32];

        assert_eq!(
            shared_nonce(&shared, &pubkey, &msg).unwrap(),
            shared_nonce(&negated, &pubkey, &msg).unwrap()
        );
    }
}
