//! Deterministic randomness for tests.

use rand::{rngs::StdRng, RngCore, SeedableRng};

/// An RNG seeded from `seed`.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// `N` bytes drawn from an RNG seeded with `seed`.
pub fn seeded_bytes<const N: usize>(seed: u64) -> [u8; N] {
    let mut bytes = [0u8; N];
    seeded_rng(seed).fill_bytes(&mut bytes);
    bytes
}
