//! Constants shared by the signing and hashing primitives.

/// Tag for BIP340 auxiliary randomness hashing.
pub const BIP340_AUX_TAG: &str = "BIP0340/aux";

/// Tag for BIP340 nonce derivation.
pub const BIP340_NONCE_TAG: &str = "BIP0340/nonce";

/// Tag for the BIP340 challenge hash.
pub const BIP340_CHALLENGE_TAG: &str = "BIP0340/challenge";

/// The curve order minus two, big-endian.
///
/// Used as the exponent for modular inversion (`x^(n-2) = x^-1 mod n`).
pub const CURVE_ORDER_MINUS_TWO: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x3f,
];

/// Minimum big-endian integer value (`0xFF^24`) a message must have to be signed.
///
/// Messages below this floor are rejected before they reach the signing primitive.
pub const MSG_MIN_VALUE: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xe9, 0x0c, 0x40, 0xde, 0x00, 0x87, 0x2d, 0x19,
    0x57, 0x3a, 0x8d, 0x23, 0x49, 0x3f, 0xc3, 0xa9, 0x15, 0x1e, 0x21, 0x7a, 0x19, 0x13, 0xe8, 0x01,
];

/// Size of a message digest accepted by the signer.
pub const MESSAGE_SIZE: usize = 32;

/// Size of a serialized BIP340 Schnorr signature.
pub const SIGNATURE_SIZE: usize = 64;
