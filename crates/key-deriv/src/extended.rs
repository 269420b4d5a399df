//! BIP32 extended keys that may or may not carry private material.

use std::{fmt, str::FromStr};

use bitcoin::{
    bip32::{ChildNumber, ChainCode, Fingerprint, Xpriv, Xpub},
    Address, Network, NetworkKind,
};
use hdcred_primitives::errors::ValidationError;
use secp256k1::{PublicKey, SECP256K1};
use tracing::trace;
use zeroize::Zeroize;

use crate::{
    address::{encode_address, AddressFormat},
    errors::WalletError,
};

/// First hardened child index.
pub const HARDENED_OFFSET: u32 = 1 << 31;

/// A node of a BIP32 tree.
///
/// Public-only nodes can derive non-hardened children. Nodes carrying an [`Xpriv`] can derive
/// both kinds.
#[derive(Clone)]
pub struct ExtendedKey {
    xpub: Xpub,
    xpriv: Option<Xpriv>,
}

impl ExtendedKey {
    /// Wraps a private extended key.
    pub fn from_xpriv(xpriv: Xpriv) -> Self {
        Self {
            xpub: Xpub::from_priv(SECP256K1, &xpriv),
            xpriv: Some(xpriv),
        }
    }

    /// Wraps a public extended key.
    pub const fn from_xpub(xpub: Xpub) -> Self {
        Self { xpub, xpriv: None }
    }

    /// Chain code.
    pub fn chain_code(&self) -> ChainCode {
        self.xpub.chain_code
    }

    /// Depth in the tree, 0 for a master key.
    pub const fn depth(&self) -> u8 {
        self.xpub.depth
    }

    /// Fingerprint of this node's public key.
    pub fn fingerprint(&self) -> Fingerprint {
        self.xpub.fingerprint()
    }

    /// Fingerprint of the parent node.
    pub const fn parent_fingerprint(&self) -> Fingerprint {
        self.xpub.parent_fingerprint
    }

    /// Child index, with the hardened bit set for hardened children.
    pub fn index(&self) -> u32 {
        u32::from(self.xpub.child_number)
    }

    /// Public point of this node.
    pub const fn public_key(&self) -> PublicKey {
        self.xpub.public_key
    }

    /// Network kind encoded in the version bytes.
    pub const fn network(&self) -> NetworkKind {
        self.xpub.network
    }

    /// Default concrete network for the version bytes: mainnet or testnet.
    pub fn default_network(&self) -> Network {
        if matches!(self.xpub.network, NetworkKind::Main) {
            Network::Bitcoin
        } else {
            Network::Testnet
        }
    }

    /// Public extended key.
    pub const fn xpub(&self) -> &Xpub {
        &self.xpub
    }

    /// Private extended key, if present.
    pub const fn xprv(&self) -> Option<&Xpriv> {
        self.xpriv.as_ref()
    }

    /// Whether private material is present.
    pub const fn has_private(&self) -> bool {
        self.xpriv.is_some()
    }

    /// Copy of this node with private material removed.
    pub const fn neutered(&self) -> Self {
        Self::from_xpub(self.xpub)
    }

    /// Derives the child at `index`. Indexes at or above [`HARDENED_OFFSET`] are hardened and
    /// require private material.
    pub fn derive_child(&self, index: u32) -> Result<Self, WalletError> {
        let child_number = ChildNumber::from(index);
        let child = match (&self.xpriv, child_number.is_hardened()) {
            (Some(xpriv), _) => Self::from_xpriv(xpriv.derive_priv(SECP256K1, &[child_number])?),
            (None, true) => return Err(ValidationError::HardenedWithoutPrivate(index).into()),
            (None, false) => Self::from_xpub(self.xpub.ckd_pub(SECP256K1, child_number)?),
        };

        trace!(parent = %self.fingerprint(), %index, "derived child key");
        Ok(child)
    }

    /// Derives the node at `path` relative to this one.
    pub fn derive_path(&self, path: &[ChildNumber]) -> Result<Self, WalletError> {
        path.iter()
            .try_fold(self.clone(), |node, child| node.derive_child(u32::from(*child)))
    }

    /// Whether this node is a direct child of `parent`.
    ///
    /// Checks the parent fingerprint and depth, then re-derives the child from `parent` and
    /// compares public points. Hardened children can only be confirmed against a private parent.
    pub fn is_child_of(&self, parent: &Self) -> bool {
        if self.parent_fingerprint() != parent.fingerprint()
            || Some(self.depth()) != parent.depth().checked_add(1)
        {
            return false;
        }

        parent
            .derive_child(self.index())
            .is_ok_and(|child| child.public_key() == self.public_key())
    }

    /// Encodes this node's public point as an address.
    pub fn address(&self, format: AddressFormat, network: Network) -> Address {
        encode_address(&self.public_key(), format, network)
    }
}

impl FromStr for ExtendedKey {
    type Err = ValidationError;

    /// Parses an `xprv`/`tprv` or `xpub`/`tpub` string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(xpriv) = Xpriv::from_str(s) {
            return Ok(Self::from_xpriv(xpriv));
        }

        Xpub::from_str(s)
            .map(Self::from_xpub)
            .map_err(|e| ValidationError::MalformedExtendedKey(e.to_string()))
    }
}

impl From<Xpriv> for ExtendedKey {
    fn from(value: Xpriv) -> Self {
        Self::from_xpriv(value)
    }
}

impl From<Xpub> for ExtendedKey {
    fn from(value: Xpub) -> Self {
        Self::from_xpub(value)
    }
}

/// Displays the public extended key.
impl fmt::Display for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.xpub, f)
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("xpub", &self.xpub.to_string())
            .field("has_private", &self.has_private())
            .finish()
    }
}

impl PartialEq for ExtendedKey {
    fn eq(&self, other: &Self) -> bool {
        self.xpub == other.xpub && self.has_private() == other.has_private()
    }
}

impl Eq for ExtendedKey {}

impl Drop for ExtendedKey {
    fn drop(&mut self) {
        if let Some(xpriv) = self.xpriv.as_mut() {
            // NOTE: `Xpriv.private_key` (`SecretKey`) `non_secure_erase` writes `1`s to the memory.
            xpriv.private_key.non_secure_erase();
            let chaincode: &mut [u8; 32] = xpriv.chain_code.as_mut();
            chaincode.zeroize();
        }
    }
}
