//! Claiming a credential's secret.

use bitcoin::bip32::Xpriv;
use hdcred_key_deriv::{ExtendedKey, KeyPair};
use hdcred_primitives::{errors::CryptoError, secp::ecdh_point};
use hdcred_signer::{nonce::shared_nonce, recover_secret};
use secp256k1::{PublicKey, SecretKey, SECP256K1};
use tracing::{debug, warn};

use crate::{errors::CredentialError, types::Credential};

/// The counterpart's child secret for `cred` and the ECDH point it shares with the credential.
fn shared_point(cred: &Credential, counterpart_xprv: &Xpriv) -> Result<PublicKey, CredentialError> {
    let child = ExtendedKey::from_xpriv(*counterpart_xprv).derive_child(cred.index())?;
    if child.public_key() != cred.xpub.public_key {
        return Err(CredentialError::RecoveryMismatch);
    }

    let secret = child
        .xprv()
        .map(|xprv| xprv.private_key)
        .ok_or(CredentialError::RecoveryMismatch)?;

    Ok(ecdh_point(&secret, &cred.pubkey)?)
}

/// Whether `counterpart_xprv` can claim `cred`.
///
/// Rebuilds the signature nonce and compares nonce points without recovering the secret.
pub fn check_claim(
    cred: &Credential,
    counterpart_xprv: &Xpriv,
) -> Result<bool, CredentialError> {
    let shared = match shared_point(cred, counterpart_xprv) {
        Ok(shared) => shared,
        Err(CredentialError::RecoveryMismatch) => return Ok(false),
        Err(e) => return Err(e),
    };

    let nonce = shared_nonce(&shared, &cred.x_only_pubkey(), &cred.message())?;
    let (nonce_point, _) = nonce.x_only_public_key(SECP256K1);
    Ok(nonce_point.serialize()[..] == cred.sig.serialize()[..32])
}

/// Recovers the secret scalar of `cred` using the counterpart's parent private key.
///
/// Fails with [`CredentialError::RecoveryMismatch`] when the key is not the one the credential
/// was issued against, or when the recovered secret does not match the credential key.
pub fn claim_secret(
    cred: &Credential,
    counterpart_xprv: &Xpriv,
) -> Result<SecretKey, CredentialError> {
    let shared = shared_point(cred, counterpart_xprv)?;
    let message = cred.message();

    let even = match recover_secret(&cred.sig, &message, &cred.x_only_pubkey(), &shared) {
        Ok(secret) => secret,
        Err(CryptoError::NonceMismatch | CryptoError::InvalidSignature) => {
            warn!(id = %hex::encode(cred.id), "credential nonce does not match counterpart key");
            return Err(CredentialError::RecoveryMismatch);
        }
        Err(e) => return Err(e.into()),
    };

    // Signing normalized the secret to an even key, so undo that if needed.
    let secret = [even, even.negate()]
        .into_iter()
        .find(|candidate| PublicKey::from_secret_key(SECP256K1, candidate) == cred.pubkey)
        .ok_or(CredentialError::RecoveryMismatch)?;

    debug!(id = %hex::encode(cred.id), "claimed credential");
    Ok(secret)
}

/// Claims `cred`, returning its key pair with the credential identifier.
pub fn claim_credential(
    cred: &Credential,
    counterpart_xprv: &Xpriv,
) -> Result<KeyPair, CredentialError> {
    Ok(KeyPair::with_id(claim_secret(cred, counterpart_xprv)?, cred.id))
}
