//! Single-party signing over a [`KeyPair`].

use hdcred_key_deriv::KeyPair;
use hdcred_primitives::{
    constants::MESSAGE_SIZE,
    errors::{CryptoError, ValidationError},
    schnorr::{self, sign_with_nonce},
    secp::ecdh_point,
};
use rand::{CryptoRng, RngCore};
use secp256k1::{schnorr::Signature, PublicKey, XOnlyPublicKey, SECP256K1};
use tracing::trace;

use crate::{
    config::SignerConfig,
    errors::SignerError,
    nonce::{derive_nonce, shared_nonce},
};

/// Signs messages and contributes to MuSig2 sessions with one key pair.
///
/// The secret never leaves this type except in the form of signatures and public nonces.
#[derive(Debug, Clone)]
pub struct Signer {
    keypair: KeyPair,
    config: SignerConfig,
}

impl Signer {
    /// Creates a signer over `keypair`.
    pub const fn new(keypair: KeyPair, config: SignerConfig) -> Self {
        Self { keypair, config }
    }

    /// Creates a signer over a freshly generated key pair.
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(rng: &mut R, config: SignerConfig) -> Self {
        Self::new(KeyPair::generate(rng), config)
    }

    /// The underlying key pair.
    pub const fn keypair(&self) -> &KeyPair {
        &self.keypair
    }

    /// Configuration in use.
    pub const fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Compressed public key.
    pub const fn pubkey(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// X-only public key, the form signatures verify against.
    pub fn x_only_pubkey(&self) -> XOnlyPublicKey {
        self.keypair.x_only_public_key()
    }

    /// Identifier of the underlying key pair.
    pub const fn id(&self) -> [u8; 32] {
        self.keypair.id()
    }

    /// Scales `counterpart` by our secret.
    pub fn ecdh(&self, counterpart: &PublicKey) -> Result<PublicKey, CryptoError> {
        self.keypair.ecdh(counterpart)
    }

    /// Signer over the child identified by `child_id`, sharing this signer's configuration.
    pub fn derive(&self, child_id: &[u8; 32]) -> Result<Self, SignerError> {
        Ok(Self::new(self.keypair.derive(child_id)?, self.config))
    }

    /// Whether `pubkey` belongs to the child identified by `child_id`.
    pub fn has_id(&self, child_id: &[u8; 32], pubkey: &PublicKey) -> bool {
        self.keypair.is_child(child_id, pubkey)
    }

    /// Signer over a child with a random identifier.
    pub fn gen_id<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R) -> Result<Self, SignerError> {
        let mut child_id = [0u8; 32];
        rng.fill_bytes(&mut child_id);
        self.derive(&child_id)
    }

    /// Public nonce for `message`, using the configured aux randomness unless `aux` overrides it.
    ///
    /// The same inputs always produce the same nonce.
    pub fn gen_nonce(
        &self,
        message: &[u8],
        aux: Option<&[u8; 32]>,
    ) -> Result<PublicKey, SignerError> {
        let secnonce = derive_nonce(
            self.keypair.secret_key(),
            message,
            aux.or(self.config.aux.as_ref()),
        )?;
        Ok(PublicKey::from_secret_key(SECP256K1, &secnonce))
    }

    /// Signs a 32-byte message.
    ///
    /// Messages of any other size, or whose big-endian value is below the configured floor, are
    /// rejected before any signing happens.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, SignerError> {
        ValidationError::check_len(message.len(), MESSAGE_SIZE)?;
        let mut msg = [0u8; MESSAGE_SIZE];
        msg.copy_from_slice(message);

        if msg < self.config.msg_min {
            return Err(ValidationError::MessageBelowFloor.into());
        }

        let secret = self.keypair.secret_key();
        let nonce = derive_nonce(secret, &msg, self.config.aux.as_ref())?;
        Ok(sign_with_nonce(&msg, secret, &nonce)?)
    }

    /// Signs `message` with the nonce bound to `ecdh(secret, counterpart)`.
    ///
    /// This deliberately discloses the nonce to whoever controls the secret behind
    /// `counterpart`, which lets them recover our secret with [`recover_secret`]. Use it only for
    /// keys meant to be handed over that way.
    pub fn sign_recoverable(
        &self,
        message: &[u8; 32],
        counterpart: &PublicKey,
    ) -> Result<Signature, SignerError> {
        let shared = self.ecdh(counterpart)?;
        let nonce = shared_nonce(&shared, &self.x_only_pubkey(), message)?;
        trace!(pubkey = %self.x_only_pubkey(), "signing with a shared nonce");
        Ok(sign_with_nonce(message, self.keypair.secret_key(), &nonce)?)
    }
}

/// Verifies a BIP340 signature.
pub fn verify_signature(
    signature: &Signature,
    message: &[u8; 32],
    pubkey: &XOnlyPublicKey,
) -> Result<(), CryptoError> {
    schnorr::verify(signature, message, pubkey)
}

/// Recovers the secret behind a [`Signer::sign_recoverable`] signature.
///
/// `shared` is the ECDH point between the signer's key and the counterpart key the signature was
/// bound to, computed from the counterpart's side. The returned secret is normalized to an even
/// public key.
pub fn recover_secret(
    signature: &Signature,
    message: &[u8; 32],
    pubkey: &XOnlyPublicKey,
    shared: &PublicKey,
) -> Result<secp256k1::SecretKey, CryptoError> {
    let nonce = shared_nonce(shared, pubkey, message)?;
    schnorr::recover_secret(signature, message, pubkey, &nonce)
}

/// Computes the ECDH point from the counterpart's side for [`recover_secret`].
pub fn counterpart_shared_point(
    counterpart_secret: &secp256k1::SecretKey,
    signer_pubkey: &PublicKey,
) -> Result<PublicKey, CryptoError> {
    ecdh_point(counterpart_secret, signer_pubkey)
}

#[cfg(test)]
mod tests {
    use hdcred_primitives::secp::EvenSecretKey;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn signer(seed: u64) -> Signer {
        Signer::generate(&mut StdRng::seed_from_u64(seed), SignerConfig::default())
    }

    #[test]
    fn rejects_wrong_sizes() {
        let signer = signer(1);
        for len in [0, 31, 33, 64] {
            assert!(matches!(
                signer.sign(&vec![0xffu8; len]),
                Err(SignerError::Validation(ValidationError::InvalidLength { .. }))
            ));
        }
    }

    #[test]
    fn rejects_messages_below_the_floor() {
        let signer = signer(2);

        assert!(matches!(
            signer.sign(&[0u8; 32]),
            Err(SignerError::Validation(ValidationError::MessageBelowFloor))
        ));

        let mut just_below = signer.config().msg_min;
        just_below[31] -= 1;
        assert!(matches!(
            signer.sign(&just_below),
            Err(SignerError::Validation(ValidationError::MessageBelowFloor))
        ));

        assert!(signer.sign(&signer.config().msg_min).is_ok());
    }

    #[test]
    fn signing_is_deterministic() {
        let signer = signer(3);
        let msg = [0xaau8; 32];
        assert_eq!(signer.sign(&msg).unwrap(), signer.sign(&msg).unwrap());

        let salted = Signer::new(
            signer.keypair().clone(),
            SignerConfig::default().with_aux([1u8; 32]),
        );
        let sig = salted.sign(&msg).unwrap();
        assert_ne!(sig, signer.sign(&msg).unwrap());
        assert!(verify_signature(&sig, &msg, &salted.x_only_pubkey()).is_ok());
    }

    #[test]
    fn gen_nonce_matches_the_signature_nonce() {
        let signer = signer(4);
        let msg = [0xbbu8; 32];
        let sig = signer.sign(&msg).unwrap();
        let nonce = signer.gen_nonce(&msg, None).unwrap();
        assert_eq!(&sig.serialize()[..32], &nonce.x_only_public_key().0.serialize());
    }

    #[test]
    fn derived_signers() {
        let mut rng = StdRng::seed_from_u64(5);
        let root = Signer::generate(&mut rng, SignerConfig::default());
        let child = root.gen_id(&mut rng).unwrap();

        assert_ne!(child.pubkey(), root.pubkey());
        assert!(root.has_id(&child.id(), &child.pubkey()));
        assert_eq!(
            root.derive(&child.id()).unwrap().pubkey(),
            child.pubkey()
        );
    }

    #[test]
    fn recoverable_signature_round_trip() {
        let signer = signer(6);
        let counterpart = EvenSecretKey::from(secp256k1::SecretKey::from_slice(&[7u8; 32]).unwrap());
        let counterpart_pub = PublicKey::from_secret_key(SECP256K1, &counterpart);
        let msg = [0x10u8; 32];

        let sig = signer.sign_recoverable(&msg, &counterpart_pub).unwrap();
        assert!(verify_signature(&sig, &msg, &signer.x_only_pubkey()).is_ok());

        let shared = counterpart_shared_point(&counterpart, &signer.pubkey()).unwrap();
        let recovered = recover_secret(&sig, &msg, &signer.x_only_pubkey(), &shared).unwrap();
        assert_eq!(
            recovered,
            *EvenSecretKey::from(*signer.keypair().secret_key())
        );

        let stranger = secp256k1::SecretKey::from_slice(&[8u8; 32]).unwrap();
        let wrong = counterpart_shared_point(&stranger, &signer.pubkey()).unwrap();
        assert_eq!(
            recover_secret(&sig, &msg, &signer.x_only_pubkey(), &wrong),
            Err(CryptoError::NonceMismatch)
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        // Any message at or above the floor signs and verifies.
        #[test]
        fn sign_then_verify(seed in any::<u64>(), mut msg in any::<[u8; 32]>()) {
            // Lift the message above the floor.
            msg[0] |= 0x01;
            let signer = signer(seed);
            let sig = signer.sign(&msg).unwrap();
            prop_assert!(verify_signature(&sig, &msg, &signer.x_only_pubkey()).is_ok());
        }
    }
}
