//! Signer configuration.

use hdcred_primitives::constants::MSG_MIN_VALUE;

/// Options applied once when a [`Signer`](crate::Signer) is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignerConfig {
    /// Smallest big-endian message value accepted by [`Signer::sign`](crate::Signer::sign).
    pub msg_min: [u8; 32],

    /// Auxiliary randomness mixed into nonce derivation. `None` keeps nonces a pure function of
    /// the key and message.
    pub aux: Option<[u8; 32]>,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            msg_min: MSG_MIN_VALUE,
            aux: None,
        }
    }
}

impl SignerConfig {
    /// Sets the auxiliary randomness.
    pub const fn with_aux(mut self, aux: [u8; 32]) -> Self {
        self.aux = Some(aux);
        self
    }
}
