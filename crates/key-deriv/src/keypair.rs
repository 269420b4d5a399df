//! Flat key identities.
//!
//! A [`KeyPair`] owns one secret scalar and exposes its public point along with a 32-byte
//! identifier. Children are derived by keyed hashing rather than BIP32, so a parent can fan out
//! any number of unrelated identities from opaque child ids.

use std::fmt;

use bitcoin::Network;
use hdcred_primitives::{
    errors::{CryptoError, ValidationError},
    hash::hmac_sha256,
    secp::{ecdh_point, parse_point, reduce_scalar},
};
use rand::{CryptoRng, RngCore};
use secp256k1::{PublicKey, SecretKey, XOnlyPublicKey, SECP256K1};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{errors::WalletError, wallet::MasterWallet};

/// A secret scalar, its public point and an identifier.
///
/// The identifier defaults to `HMAC(secret, public)`. Imported or derived keys may carry an
/// externally supplied identifier instead.
#[derive(Clone)]
pub struct KeyPair {
    secret: SecretKey,
    public: PublicKey,
    id: [u8; 32],
}

impl KeyPair {
    /// Generates a fresh key pair from `rng`.
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        loop {
            rng.fill_bytes(&mut bytes);
            if let Ok(secret) = reduce_scalar(&bytes) {
                bytes.zeroize();
                return Self::from_secret(secret);
            }
        }
    }

    /// Imports a key pair from 32 secret bytes, reduced modulo the curve order.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        ValidationError::check_len(bytes.len(), 32)?;
        let mut buf = [0u8; 32];
        buf.copy_from_slice(bytes);
        let secret = reduce_scalar(&buf);
        buf.zeroize();
        Ok(Self::from_secret(secret?))
    }

    /// Builds a key pair whose identifier is `HMAC(secret, public)`.
    pub fn from_secret(secret: SecretKey) -> Self {
        let public = PublicKey::from_secret_key(SECP256K1, &secret);
        let id = hmac_sha256(&secret.secret_bytes(), &[&public.serialize()]);
        Self { secret, public, id }
    }

    /// Builds a key pair carrying an externally supplied identifier.
    pub fn with_id(secret: SecretKey, id: [u8; 32]) -> Self {
        let public = PublicKey::from_secret_key(SECP256K1, &secret);
        Self { secret, public, id }
    }

    /// The secret scalar.
    ///
    /// Callers that hold a key pair already control its secret; this accessor exists so signing
    /// layers can use it without copying it out.
    pub const fn secret_key(&self) -> &SecretKey {
        &self.secret
    }

    /// The compressed public point.
    pub const fn public_key(&self) -> PublicKey {
        self.public
    }

    /// The x-only public point.
    pub fn x_only_public_key(&self) -> XOnlyPublicKey {
        self.public.x_only_public_key().0
    }

    /// The identifier.
    pub const fn id(&self) -> [u8; 32] {
        self.id
    }

    /// Keyed hash with the secret scalar as the key.
    pub fn hmac(&self, parts: &[&[u8]]) -> [u8; 32] {
        hmac_sha256(&self.secret.secret_bytes(), parts)
    }

    /// Derives the child identified by `child_id`.
    ///
    /// The child secret is `reduce(HMAC(secret, public ‖ child_id))` and the child carries
    /// `child_id` as its identifier.
    pub fn derive(&self, child_id: &[u8; 32]) -> Result<Self, ValidationError> {
        let mut bytes = self.hmac(&[&self.public.serialize(), child_id]);
        let secret = reduce_scalar(&bytes);
        bytes.zeroize();
        Ok(Self::with_id(secret?, *child_id))
    }

    /// Whether the identifier is the default one, i.e. the key was not derived or imported with
    /// a foreign identifier.
    pub fn is_root(&self) -> bool {
        self.hmac(&[&self.public.serialize()]) == self.id
    }

    /// Whether `pubkey` is the public point of the child derived from `child_id`.
    pub fn is_child(&self, child_id: &[u8; 32], pubkey: &PublicKey) -> bool {
        self.derive(child_id)
            .is_ok_and(|child| child.public_key() == *pubkey)
    }

    /// Scales `counterpart` by the secret scalar.
    pub fn ecdh(&self, counterpart: &PublicKey) -> Result<PublicKey, CryptoError> {
        ecdh_point(&self.secret, counterpart)
    }

    /// Decodes a 33-byte or x-only point and scales it by the secret scalar.
    pub fn ecdh_encoded(&self, counterpart: &[u8]) -> Result<PublicKey, WalletError> {
        let point = parse_point(counterpart)?;
        Ok(self.ecdh(&point)?)
    }

    /// Builds a master wallet seeded with the secret scalar.
    pub fn master_wallet(&self, network: Network) -> Result<MasterWallet, WalletError> {
        let mut seed = self.secret.secret_bytes();
        let wallet = MasterWallet::from_seed(&seed, network);
        seed.zeroize();
        wallet
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.public == other.public && self.id == other.id
    }
}

impl Eq for KeyPair {}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &hex::encode(self.public.serialize()))
            .field("id", &hex::encode(self.id))
            .finish_non_exhaustive()
    }
}

// Manual Drop implementation to zeroize keys on drop.
impl Drop for KeyPair {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Zeroize for KeyPair {
    #[inline]
    fn zeroize(&mut self) {
        // NOTE: `SecretKey::non_secure_erase` writes `1`s to the memory.
        self.secret.non_secure_erase();
        self.id.zeroize();
    }
}

impl ZeroizeOnDrop for KeyPair {}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn scalar_one() -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        bytes
    }

    #[test]
    fn import_of_one_is_the_generator() {
        let kp = KeyPair::from_secret_bytes(&scalar_one()).unwrap();
        assert_eq!(
            hex::encode(kp.public_key().serialize()),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        assert!(kp.is_root());
    }

    #[test]
    fn import_rejects_zero_and_bad_lengths() {
        assert_eq!(
            KeyPair::from_secret_bytes(&[0u8; 32]),
            Err(ValidationError::ScalarOutOfRange)
        );
        assert_eq!(
            KeyPair::from_secret_bytes(&[1u8; 16]),
            Err(ValidationError::InvalidLength {
                expected: 32,
                actual: 16
            })
        );
    }

    #[test]
    fn derived_children_carry_their_id() {
        let parent = KeyPair::generate(&mut StdRng::seed_from_u64(1));
        let child_id = [9u8; 32];
        let child = parent.derive(&child_id).unwrap();

        assert_eq!(child.id(), child_id);
        assert!(!child.is_root());
        assert!(parent.is_child(&child_id, &child.public_key()));
        assert!(!parent.is_child(&[8u8; 32], &child.public_key()));
    }

    #[test]
    fn foreign_id_is_not_root() {
        let kp = KeyPair::generate(&mut StdRng::seed_from_u64(2));
        let imported = KeyPair::with_id(*kp.secret_key(), [0u8; 32]);
        assert_eq!(imported.public_key(), kp.public_key());
        assert!(!imported.is_root());
    }

    #[test]
    fn ecdh_agrees_between_parties() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = KeyPair::generate(&mut rng);
        let b = KeyPair::generate(&mut rng);

        assert_eq!(
            a.ecdh(&b.public_key()).unwrap(),
            b.ecdh_encoded(&a.public_key().serialize()).unwrap()
        );
        assert!(a.ecdh_encoded(&[5u8; 33]).is_err());
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let kp = KeyPair::from_secret_bytes(&scalar_one()).unwrap();
        let rendered = format!("{kp:?}");
        assert!(rendered.contains("0279be66"));
        assert!(!rendered.contains(&hex::encode(scalar_one())));
    }

    #[test]
    fn test_zeroize() {
        let mut kp = KeyPair::generate(&mut StdRng::seed_from_u64(4));
        kp.zeroize();

        // NOTE: SecretKey::non_secure_erase writes `1`s to the memory.
        assert_eq!(kp.secret_key().secret_bytes(), [1u8; 32]);
        assert_eq!(kp.id(), [0u8; 32]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        // Re-importing the secret of any key pair yields the same public point and id.
        #[test]
        fn import_is_deterministic(seed in any::<u64>()) {
            let kp = KeyPair::generate(&mut StdRng::seed_from_u64(seed));
            let again = KeyPair::from_secret_bytes(&kp.secret_key().secret_bytes()).unwrap();
            prop_assert_eq!(kp.public_key(), again.public_key());
            prop_assert_eq!(kp.id(), again.id());
        }

        // Deriving the same child twice yields bit-identical children.
        #[test]
        fn derive_is_pure(seed in any::<u64>(), child_id in any::<[u8; 32]>()) {
            let kp = KeyPair::generate(&mut StdRng::seed_from_u64(seed));
            let a = kp.derive(&child_id).unwrap();
            let b = kp.derive(&child_id).unwrap();
            prop_assert_eq!(a.secret_key().secret_bytes(), b.secret_key().secret_bytes());
            prop_assert_eq!(a, b);
        }
    }
}
