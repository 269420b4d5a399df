//! BIP32 derivation paths for the wallet hierarchy.
//!
//! ```text
//! Master Seed (16..=64 bytes)
//! └── m/84'/0'/0' ─── mainnet account root (MasterWallet)
//!     └── <account>/<index> ─── non-hardened children
//! ```
//!
//! Test networks use coin type `1'` instead of `0'`.
use bitcoin::{bip32::ChildNumber, NetworkKind};

/// BIP84 purpose index.
pub(crate) const PURPOSE_IDX: ChildNumber = ChildNumber::Hardened { index: 84 };

/// Coin type for mainnet keys.
pub(crate) const MAIN_COIN_IDX: ChildNumber = ChildNumber::Hardened { index: 0 };

/// Coin type for test network keys.
pub(crate) const TEST_COIN_IDX: ChildNumber = ChildNumber::Hardened { index: 1 };

/// First account under the coin type.
pub(crate) const ACCOUNT_IDX: ChildNumber = ChildNumber::Hardened { index: 0 };

/// Master wallet path on mainnet (`m/84'/0'/0'`).
pub(crate) const MAIN_WALLET_PATH: &[ChildNumber] = &[PURPOSE_IDX, MAIN_COIN_IDX, ACCOUNT_IDX];

/// Master wallet path on test networks (`m/84'/1'/0'`).
pub(crate) const TEST_WALLET_PATH: &[ChildNumber] = &[PURPOSE_IDX, TEST_COIN_IDX, ACCOUNT_IDX];

/// Picks the master wallet path for a network kind.
pub(crate) const fn wallet_path(kind: NetworkKind) -> &'static [ChildNumber] {
    if matches!(kind, NetworkKind::Main) {
        MAIN_WALLET_PATH
    } else {
        TEST_WALLET_PATH
    }
}
