//! Re-exports of the fixtures most tests reach for.

pub use crate::{
    keys::{counterpart_master, counterpart_xpriv, counterpart_xpub, issuer_keypair, issuer_signer},
    musig2::MusigGroup,
    rng::{seeded_bytes, seeded_rng},
};
