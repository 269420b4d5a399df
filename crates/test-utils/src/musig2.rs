//! Module for test-utilities related to `musig2`.

use hdcred_signer::{MusigSession, Signer, SignerConfig, MUSIG_AUX_SIZE};
use musig2::{PartialSignature, PubNonce};
use rand::RngCore;
use secp256k1::{schnorr::Signature, XOnlyPublicKey};

use crate::rng::seeded_rng;

/// A set of signers that run MuSig2 rounds together, each with its own aux payload.
#[derive(Debug)]
pub struct MusigGroup {
    /// The participants.
    pub signers: Vec<Signer>,

    /// One aux payload per participant, in the same order.
    pub auxes: Vec<[u8; MUSIG_AUX_SIZE]>,
}

impl MusigGroup {
    /// A group of `count` freshly generated signers.
    pub fn generate(count: usize, seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let signers = (0..count)
            .map(|_| Signer::generate(&mut rng, SignerConfig::default()))
            .collect();
        Self::with_signers(signers, seed)
    }

    /// A group over existing signers.
    pub fn with_signers(signers: Vec<Signer>, seed: u64) -> Self {
        let mut rng = seeded_rng(seed.wrapping_add(1));
        let auxes = signers
            .iter()
            .map(|_| {
                let mut aux = [0u8; MUSIG_AUX_SIZE];
                rng.fill_bytes(&mut aux);
                aux
            })
            .collect();
        Self { signers, auxes }
    }

    /// Every participant's public nonce.
    pub fn pubnonces(&self) -> Vec<PubNonce> {
        self.signers
            .iter()
            .zip(&self.auxes)
            .map(|(signer, aux)| signer.session_nonce(aux).expect("aux has the right size"))
            .collect()
    }

    /// A session over `message`.
    pub fn session(&self, message: [u8; 32]) -> MusigSession {
        MusigSession::new(self.signers.iter().map(Signer::pubkey), &self.pubnonces(), message)
            .expect("participant keys aggregate")
    }

    /// Runs a full round over `message`, returning the aggregated signature and key.
    pub fn sign(&self, message: [u8; 32]) -> (Signature, XOnlyPublicKey) {
        let session = self.session(message);
        let partials: Vec<PartialSignature> = self
            .signers
            .iter()
            .zip(&self.auxes)
            .map(|(signer, aux)| signer.musign(&session, aux).expect("participant signs"))
            .collect();

        let signature = session.aggregate(partials).expect("partials aggregate");
        (signature, session.aggregated_pubkey().x_only_public_key().0)
    }
}
