//! MuSig2 participation.
//!
//! The signer contributes nonces and partial signatures to a session it does not own. Secret
//! nonces are never stored: each one is re-derived from the 64-byte aux payload the
//! coordinator hands out for the session, one nonce scalar per 32-byte chunk.

use hdcred_primitives::errors::ValidationError;
use musig2::{
    aggregate_partial_signatures, sign_partial, verify_partial, AggNonce, KeyAggContext,
    PartialSignature, PubNonce, SecNonce,
};
use secp256k1::{schnorr::Signature, PublicKey};
use tracing::debug;

use crate::{errors::SignerError, nonce::derive_nonce, signer::Signer};

/// Size of the aux payload consumed by [`Signer::musign`].
pub const MUSIG_AUX_SIZE: usize = 64;

/// Aggregation context for one signing round.
#[derive(Debug, Clone)]
pub struct MusigSession {
    /// Key aggregation context over all participants.
    pub key_agg_ctx: KeyAggContext,

    /// Sum of every participant's public nonce.
    pub agg_nonce: AggNonce,

    /// Message being signed.
    pub message: [u8; 32],
}

impl MusigSession {
    /// Builds a session from the participants' keys and public nonces.
    pub fn new(
        pubkeys: impl IntoIterator<Item = PublicKey>,
        pubnonces: &[PubNonce],
        message: [u8; 32],
    ) -> Result<Self, SignerError> {
        Ok(Self {
            key_agg_ctx: KeyAggContext::new(pubkeys)?,
            agg_nonce: AggNonce::sum(pubnonces),
            message,
        })
    }

    /// The aggregated public key the final signature verifies against.
    pub fn aggregated_pubkey(&self) -> PublicKey {
        self.key_agg_ctx.aggregated_pubkey()
    }

    /// Checks one participant's partial signature.
    pub fn verify_partial(
        &self,
        partial: PartialSignature,
        pubkey: PublicKey,
        pubnonce: &PubNonce,
    ) -> Result<(), SignerError> {
        Ok(verify_partial(
            &self.key_agg_ctx,
            partial,
            &self.agg_nonce,
            pubkey,
            pubnonce,
            self.message,
        )?)
    }

    /// Combines every participant's partial signature into a BIP340 signature.
    pub fn aggregate(
        &self,
        partials: impl IntoIterator<Item = PartialSignature>,
    ) -> Result<Signature, SignerError> {
        Ok(aggregate_partial_signatures(
            &self.key_agg_ctx,
            &self.agg_nonce,
            partials,
            self.message,
        )?)
    }
}

impl Signer {
    /// Builds the secret nonce for `aux`: one deterministic nonce scalar per 32-byte chunk.
    fn session_secnonce(&self, aux: &[u8]) -> Result<SecNonce, SignerError> {
        ValidationError::check_len(aux.len(), MUSIG_AUX_SIZE)?;

        let (first, second) = aux.split_at(MUSIG_AUX_SIZE / 2);
        let secret = self.keypair().secret_key();
        let config_aux = self.config().aux.as_ref();
        let mut k1 = derive_nonce(secret, first, config_aux)?;
        let mut k2 = derive_nonce(secret, second, config_aux)?;

        let secnonce = SecNonce::new(k1, k2, self.pubkey());
        k1.non_secure_erase();
        k2.non_secure_erase();
        Ok(secnonce)
    }

    /// Public nonce this signer contributes for `aux`.
    pub fn session_nonce(&self, aux: &[u8]) -> Result<PubNonce, SignerError> {
        Ok(self.session_secnonce(aux)?.public_nonce())
    }

    /// Partial signature for `session`, using the nonce announced by
    /// [`session_nonce`](Self::session_nonce) for the same `aux`.
    pub fn musign(
        &self,
        session: &MusigSession,
        aux: &[u8],
    ) -> Result<PartialSignature, SignerError> {
        let secnonce = self.session_secnonce(aux)?;
        let partial = sign_partial::<PartialSignature>(
            &session.key_agg_ctx,
            *self.keypair().secret_key(),
            secnonce,
            &session.agg_nonce,
            session.message,
        )?;

        debug!(pubkey = %self.pubkey(), "produced partial signature");
        Ok(partial)
    }
}
