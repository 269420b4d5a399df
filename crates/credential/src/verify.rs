//! Credential verification.

use bitcoin::bip32::Xpub;
use hdcred_key_deriv::ExtendedKey;
use hdcred_signer::verify_signature;
use secp256k1::PublicKey;
use tracing::{debug, warn};

use crate::{
    errors::{CredentialCheck, CredentialError},
    types::{credential_id, Credential},
};

/// Verifies `cred` against the issuer's public key and the parent extended key it was issued
/// against.
///
/// Checks run in order: identifier, chain from `parent_xpub`, then signature. The first
/// failing check is reported.
pub fn verify_credential(
    cred: &Credential,
    issuer_pub: &PublicKey,
    parent_xpub: &Xpub,
) -> Result<(), CredentialError> {
    let result = check(cred, issuer_pub, parent_xpub);
    match &result {
        Ok(()) => debug!(id = %hex::encode(cred.id), "credential verified"),
        Err(failed) => warn!(id = %hex::encode(cred.id), check = %failed, "credential rejected"),
    }

    result.map_err(CredentialError::Invalid)
}

fn check(
    cred: &Credential,
    issuer_pub: &PublicKey,
    parent_xpub: &Xpub,
) -> Result<(), CredentialCheck> {
    if credential_id(issuer_pub, parent_xpub) != cred.id {
        return Err(CredentialCheck::Id);
    }

    let child = ExtendedKey::from_xpub(cred.xpub);
    if !child.is_child_of(&ExtendedKey::from_xpub(*parent_xpub)) {
        return Err(CredentialCheck::Chain);
    }

    verify_signature(&cred.sig, &cred.message(), &cred.x_only_pubkey())
        .map_err(|_| CredentialCheck::Signature)
}
