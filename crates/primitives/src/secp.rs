//! SECP256K1 primitives.

use std::ops::Deref;

use secp256k1::{
    constants::CURVE_ORDER, Parity, PublicKey, Scalar, SecretKey, XOnlyPublicKey, SECP256K1,
};

use crate::{
    constants::CURVE_ORDER_MINUS_TWO,
    errors::{CryptoError, ValidationError},
};

/// A secret key that is guaranteed to have a even x-only public key
#[derive(Debug)]
pub struct EvenSecretKey(SecretKey);

impl Deref for EvenSecretKey {
    type Target = SecretKey;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<SecretKey> for EvenSecretKey {
    fn as_ref(&self) -> &SecretKey {
        &self.0
    }
}

impl From<SecretKey> for EvenSecretKey {
    fn from(value: SecretKey) -> Self {
        match value.x_only_public_key(SECP256K1).1 == Parity::Odd {
            true => Self(value.negate()),
            false => Self(value),
        }
    }
}

/// Reduces 32 big-endian bytes modulo the curve order.
///
/// A single subtraction is enough since `2^256 < 2n`. Fails if the result is zero.
pub fn reduce_scalar(bytes: &[u8; 32]) -> Result<SecretKey, ValidationError> {
    let mut value = *bytes;
    if value >= CURVE_ORDER {
        let mut borrow = 0u8;
        for i in (0..32).rev() {
            let (diff, under_a) = value[i].overflowing_sub(CURVE_ORDER[i]);
            let (diff, under_b) = diff.overflowing_sub(borrow);
            value[i] = diff;
            borrow = u8::from(under_a || under_b);
        }
    }

    SecretKey::from_slice(&value).map_err(|_| ValidationError::ScalarOutOfRange)
}

/// Parses a secret scalar, requiring `0 < value < n` without reduction.
pub fn parse_secret(bytes: &[u8]) -> Result<SecretKey, ValidationError> {
    ValidationError::check_len(bytes.len(), 32)?;
    SecretKey::from_slice(bytes).map_err(|_| ValidationError::ScalarOutOfRange)
}

/// Parses a 33-byte compressed point or a 32-byte x-only point (lifted to even y).
pub fn parse_point(bytes: &[u8]) -> Result<PublicKey, ValidationError> {
    match bytes.len() {
        33 => PublicKey::from_slice(bytes).map_err(|_| ValidationError::InvalidPoint),
        32 => XOnlyPublicKey::from_slice(bytes)
            .map(|x| x.public_key(Parity::Even))
            .map_err(|_| ValidationError::InvalidPoint),
        actual => Err(ValidationError::InvalidLength {
            expected: 33,
            actual,
        }),
    }
}

/// The 32-byte x-only encoding of a point.
pub fn xonly_bytes(point: &PublicKey) -> [u8; 32] {
    point.x_only_public_key().0.serialize()
}

/// Scales `point` by `secret`.
pub fn ecdh_point(secret: &SecretKey, point: &PublicKey) -> Result<PublicKey, CryptoError> {
    point
        .mul_tweak(SECP256K1, &Scalar::from(*secret))
        .map_err(|_| CryptoError::InvalidEcdhPoint)
}

/// Computes the multiplicative inverse of `x` modulo the curve order.
///
/// Square-and-multiply over the exponent `n - 2`.
pub fn invert_scalar(x: &SecretKey) -> Result<SecretKey, CryptoError> {
    let base = Scalar::from(*x);
    let mut acc: Option<SecretKey> = None;

    for byte in CURVE_ORDER_MINUS_TWO {
        for bit in (0..8).rev() {
            if let Some(current) = acc {
                acc = Some(current.mul_tweak(&Scalar::from(current))?);
            }
            if (byte >> bit) & 1 == 1 {
                acc = Some(match acc {
                    Some(current) => current.mul_tweak(&base)?,
                    None => *x,
                });
            }
        }
    }

    acc.ok_or(CryptoError::ZeroScalar)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::thread_rng;

    use super::*;

    fn one() -> SecretKey {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        SecretKey::from_slice(&bytes).unwrap()
    }

    #[test]
    fn reduce_passes_small_values_through() {
        let sk = SecretKey::new(&mut thread_rng());
        assert_eq!(reduce_scalar(&sk.secret_bytes()).unwrap(), sk);
    }

    #[test]
    fn reduce_wraps_values_above_the_order() {
        let mut order_plus_one = CURVE_ORDER;
        order_plus_one[31] += 1;
        assert_eq!(reduce_scalar(&order_plus_one).unwrap(), one());

        // 2^256 - 1 reduces to 2^256 - 1 - n.
        let reduced = reduce_scalar(&[0xff; 32]).unwrap();
        assert_eq!(
            hex::encode(reduced.secret_bytes()),
            "000000000000000000000000000000014551231950b75fc4402da1732fc9bebe"
        );
    }

    #[test]
    fn reduce_rejects_zero_and_the_order() {
        assert_eq!(
            reduce_scalar(&[0u8; 32]),
            Err(ValidationError::ScalarOutOfRange)
        );
        assert_eq!(
            reduce_scalar(&CURVE_ORDER),
            Err(ValidationError::ScalarOutOfRange)
        );
    }

    #[test]
    fn parse_secret_is_strict() {
        assert!(parse_secret(&CURVE_ORDER).is_err());
        assert!(matches!(
            parse_secret(&[1u8; 31]),
            Err(ValidationError::InvalidLength {
                expected: 32,
                actual: 31
            })
        ));
    }

    #[test]
    fn parse_point_accepts_both_encodings() {
        let sk = SecretKey::new(&mut thread_rng());
        let pk = PublicKey::from_secret_key(SECP256K1, &sk);

        assert_eq!(parse_point(&pk.serialize()).unwrap(), pk);

        let lifted = parse_point(&xonly_bytes(&pk)).unwrap();
        assert_eq!(lifted.x_only_public_key(), (pk.x_only_public_key().0, Parity::Even));

        assert!(matches!(
            parse_point(&[0u8; 10]),
            Err(ValidationError::InvalidLength { .. })
        ));
    }

    #[test]
    fn ecdh_is_commutative() {
        let a = SecretKey::new(&mut thread_rng());
        let b = SecretKey::new(&mut thread_rng());
        let pa = PublicKey::from_secret_key(SECP256K1, &a);
        let pb = PublicKey::from_secret_key(SECP256K1, &b);

        assert_eq!(ecdh_point(&a, &pb).unwrap(), ecdh_point(&b, &pa).unwrap());
    }

    #[test]
    fn even_secret_key_has_even_xonly_key() {
        for _ in 0..16 {
            let sk = EvenSecretKey::from(SecretKey::new(&mut thread_rng()));
            assert_eq!(sk.x_only_public_key(SECP256K1).1, Parity::Even);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        // x * x^-1 == 1 for random non-zero scalars.
        #[test]
        fn inversion_roundtrip(bytes in any::<[u8; 32]>()) {
            prop_assume!(bytes != [0u8; 32]);
            let x = reduce_scalar(&bytes).unwrap();
            let inv = invert_scalar(&x).unwrap();
            prop_assert_eq!(x.mul_tweak(&Scalar::from(inv)).unwrap(), one());
        }
    }
}
