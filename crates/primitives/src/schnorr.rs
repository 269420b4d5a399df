//! BIP340 Schnorr signing with an explicit nonce, verification and known-nonce key recovery.
//!
//! [`sign_with_nonce`] produces standard BIP340 signatures, so they verify with any BIP340
//! verifier. The caller supplies the nonce scalar. If the same nonce can be reproduced by someone
//! else, that party can run [`recover_secret`] to solve `s = k + e·d` for `d`. The credential
//! claim protocol relies on exactly this.

use secp256k1::{schnorr::Signature, Message, Scalar, SecretKey, XOnlyPublicKey, SECP256K1};

use crate::{
    constants::{BIP340_CHALLENGE_TAG, SIGNATURE_SIZE},
    errors::CryptoError,
    hash::tagged_hash,
    secp::{invert_scalar, reduce_scalar, EvenSecretKey},
};

/// Computes the BIP340 challenge `e = H_challenge(R.x ‖ P.x ‖ m) mod n`.
pub fn challenge(
    nonce_point: &XOnlyPublicKey,
    pubkey: &XOnlyPublicKey,
    message: &[u8; 32],
) -> Result<SecretKey, CryptoError> {
    let hash = tagged_hash(
        BIP340_CHALLENGE_TAG,
        &[&nonce_point.serialize(), &pubkey.serialize(), message],
    );
    reduce_scalar(&hash).map_err(|_| CryptoError::ZeroScalar)
}

/// Signs `message` with `secret` using the nonce scalar `nonce`.
///
/// Both the secret and the nonce are normalized to even-y points before use, as BIP340 requires.
pub fn sign_with_nonce(
    message: &[u8; 32],
    secret: &SecretKey,
    nonce: &SecretKey,
) -> Result<Signature, CryptoError> {
    let d: SecretKey = *EvenSecretKey::from(*secret);
    let k: SecretKey = *EvenSecretKey::from(*nonce);

    let (pubkey, _) = d.x_only_public_key(SECP256K1);
    let (nonce_point, _) = k.x_only_public_key(SECP256K1);

    let e = challenge(&nonce_point, &pubkey, message)?;
    let s = d.mul_tweak(&Scalar::from(e))?.add_tweak(&Scalar::from(k))?;

    let mut sig = [0u8; SIGNATURE_SIZE];
    sig[..32].copy_from_slice(&nonce_point.serialize());
    sig[32..].copy_from_slice(&s.secret_bytes());

    Ok(Signature::from_slice(&sig)?)
}

/// Verifies a BIP340 signature over a 32-byte message.
pub fn verify(
    signature: &Signature,
    message: &[u8; 32],
    pubkey: &XOnlyPublicKey,
) -> Result<(), CryptoError> {
    SECP256K1
        .verify_schnorr(signature, &Message::from_digest(*message), pubkey)
        .map_err(|_| CryptoError::InvalidSignature)
}

/// Recovers the even-normalized secret behind `pubkey` from a signature whose nonce is known.
///
/// Fails with [`CryptoError::NonceMismatch`] if `nonce` does not reproduce the signature's nonce
/// point, which happens when the wrong shared secret was used to rebuild it.
pub fn recover_secret(
    signature: &Signature,
    message: &[u8; 32],
    pubkey: &XOnlyPublicKey,
    nonce: &SecretKey,
) -> Result<SecretKey, CryptoError> {
    let bytes = signature.serialize();
    let k: SecretKey = *EvenSecretKey::from(*nonce);

    let (nonce_point, _) = k.x_only_public_key(SECP256K1);
    if nonce_point.serialize()[..] != bytes[..32] {
        return Err(CryptoError::NonceMismatch);
    }

    let s = SecretKey::from_slice(&bytes[32..])?;
    let e = challenge(&nonce_point, pubkey, message)?;

    // d = (s - k) / e
    let s_minus_k = s
        .add_tweak(&Scalar::from(k.negate()))
        .map_err(|_| CryptoError::ZeroScalar)?;
    let d = s_minus_k.mul_tweak(&Scalar::from(invert_scalar(&e)?))?;

    if d.x_only_public_key(SECP256K1).0 != *pubkey {
        return Err(CryptoError::InvalidSignature);
    }

    Ok(d)
}
