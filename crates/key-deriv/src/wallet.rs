//! Wallets: an extended key plus an address cache and a monotonic index.
//!
//! A [`MasterWallet`] is the account root built from a seed. Accounts below it are plain
//! [`Wallet`]s, and addresses are materialized from their children.

use bitcoin::{bip32::Xpriv, Network, NetworkKind};
use hdcred_primitives::errors::ValidationError;
use indexmap::IndexSet;
use rand::{CryptoRng, RngCore};
use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroize;

use crate::{
    address::{decode_address, AddressFormat},
    errors::WalletError,
    extended::{ExtendedKey, HARDENED_OFFSET},
    paths::wallet_path,
};

/// Number of address indexes probed by membership checks unless told otherwise.
pub const DEFAULT_ADDRESS_LIMIT: u32 = 100;

/// Accepted seed sizes for the master key, in bytes.
pub const SEED_LEN_RANGE: std::ops::RangeInclusive<usize> = 16..=64;

/// Mask keeping account indexes in the non-hardened range.
const ACCOUNT_INDEX_MASK: u32 = HARDENED_OFFSET - 1;

/// An extended key with an address cache and a next-index counter.
///
/// The cache only grows and never holds duplicates. The counter only increases. Callers sharing
/// one wallet across threads must serialize mutable calls themselves.
#[derive(Debug, Clone)]
pub struct Wallet {
    key: ExtendedKey,
    network: Network,
    addresses: IndexSet<String>,
    index: u32,
}

impl Wallet {
    /// Creates a wallet over `key`, materializing addresses for `network`.
    pub fn new(key: ExtendedKey, network: Network) -> Self {
        Self {
            key,
            network,
            addresses: IndexSet::new(),
            index: 0,
        }
    }

    /// Creates a wallet using the network implied by the key's version bytes.
    pub fn from_key(key: ExtendedKey) -> Self {
        let network = key.default_network();
        Self::new(key, network)
    }

    /// Sets the counter to start from `index`.
    pub const fn with_start_index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }

    /// The underlying extended key.
    pub const fn key(&self) -> &ExtendedKey {
        &self.key
    }

    /// Network used for address encoding.
    pub const fn network(&self) -> Network {
        self.network
    }

    /// Current value of the address counter.
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Cached addresses in the order they were first produced.
    pub const fn addresses(&self) -> &IndexSet<String> {
        &self.addresses
    }

    /// Copy of this wallet with private material removed and an empty cache.
    pub fn neutered(&self) -> Self {
        Self::new(self.key.neutered(), self.network).with_start_index(self.index)
    }

    /// Derives the account wallet at `index`.
    pub fn account(&self, index: u32) -> Result<Self, WalletError> {
        let key = self.key.derive_child(index)?;
        debug!(%index, xpub = %key, "derived account");
        Ok(Self::new(key, self.network))
    }

    /// Derives the account whose index is the first four bytes of `account_id`, big-endian,
    /// masked to 31 bits.
    pub fn get_account(&self, account_id: &[u8]) -> Result<Self, WalletError> {
        let prefix: [u8; 4] = account_id
            .get(..4)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(ValidationError::InvalidLength {
                expected: 4,
                actual: account_id.len(),
            })?;

        self.account(u32::from_be_bytes(prefix) & ACCOUNT_INDEX_MASK)
    }

    /// Whether `candidate` is the child of this wallet at `candidate.index()`.
    pub fn has_account(&self, candidate: &ExtendedKey) -> Result<bool, WalletError> {
        let expected = self.key.derive_child(candidate.index())?;
        Ok(expected.public_key() == candidate.public_key())
    }

    /// Returns the address of the child at `index` and records it in the cache.
    ///
    /// Nothing is cached if derivation fails.
    pub fn get_address(&mut self, index: u32, format: AddressFormat) -> Result<String, WalletError> {
        let address = self
            .key
            .derive_child(index)?
            .address(format, self.network)
            .to_string();

        self.addresses.insert(address.clone());

        Ok(address)
    }

    /// Advances the counter and returns the address at the new index.
    ///
    /// The counter is only advanced once the address has been derived.
    pub fn new_address(&mut self, format: AddressFormat) -> Result<String, WalletError> {
        let index = self
            .index
            .checked_add(1)
            .ok_or(ValidationError::IndexOutOfRange(self.index))?;

        let address = self.get_address(index, format)?;
        self.index = index;
        Ok(address)
    }

    /// Whether `address` belongs to this wallet within the first `limit` indexes.
    ///
    /// Hits the cache first and otherwise re-derives indexes `0..limit` in the address's format,
    /// caching every probe. This is a linear scan, so callers needing fast lookups should keep
    /// their own index.
    pub fn has_address(&mut self, address: &str, limit: u32) -> Result<bool, WalletError> {
        if self.addresses.contains(address) {
            return Ok(true);
        }

        let decoded = decode_address(address)?;
        if NetworkKind::from(decoded.network) != NetworkKind::from(self.network) {
            return Ok(false);
        }

        for index in 0..limit {
            if self.get_address(index, decoded.format)? == address {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Whether `pubkey` is the public point of one of the first `limit` children.
    pub fn has_pubkey(&self, pubkey: &PublicKey, limit: u32) -> Result<bool, WalletError> {
        for index in 0..limit {
            if self.key.derive_child(index)?.public_key() == *pubkey {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Serializable description of the wallet node.
    pub fn summary(&self) -> WalletSummary {
        WalletSummary {
            code: hex::encode(self.key.chain_code().as_bytes()),
            depth: self.key.depth(),
            fp: self.key.fingerprint().to_string(),
            index: self.key.index(),
            pfp: self.key.parent_fingerprint().to_string(),
            pubkey: hex::encode(self.key.public_key().serialize()),
            xpub: self.key.to_string(),
        }
    }
}

/// Public description of a wallet node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSummary {
    /// Chain code, hex.
    pub code: String,

    /// Depth in the tree.
    pub depth: u8,

    /// Fingerprint, hex.
    pub fp: String,

    /// Child index including the hardened bit.
    pub index: u32,

    /// Parent fingerprint, hex.
    pub pfp: String,

    /// Compressed public key, hex.
    pub pubkey: String,

    /// Public extended key.
    pub xpub: String,
}

/// The account root derived from a seed.
///
/// Lives at `m/84'/0'/0'` on mainnet and `m/84'/1'/0'` on test networks.
#[derive(Debug, Clone)]
pub struct MasterWallet {
    wallet: Wallet,
}

impl MasterWallet {
    /// Builds the master wallet from `seed`.
    pub fn from_seed(seed: &[u8], network: Network) -> Result<Self, WalletError> {
        if !SEED_LEN_RANGE.contains(&seed.len()) {
            return Err(ValidationError::InvalidSeedLength(seed.len()).into());
        }

        let master = ExtendedKey::from_xpriv(Xpriv::new_master(network, seed)?);
        let key = master.derive_path(wallet_path(NetworkKind::from(network)))?;
        debug!(fingerprint = %key.fingerprint(), %network, "created master wallet");

        Ok(Self {
            wallet: Wallet::new(key, network),
        })
    }

    /// Builds a master wallet from a fresh 64-byte seed.
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(
        rng: &mut R,
        network: Network,
    ) -> Result<Self, WalletError> {
        let mut seed = [0u8; 64];
        rng.fill_bytes(&mut seed);
        let wallet = Self::from_seed(&seed, network);
        seed.zeroize();
        wallet
    }

    /// The wallet at the account root.
    pub const fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Mutable access to the wallet at the account root.
    pub fn wallet_mut(&mut self) -> &mut Wallet {
        &mut self.wallet
    }

    /// Consumes the master wallet, returning the account root wallet.
    pub fn into_wallet(self) -> Wallet {
        self.wallet
    }

    /// Derives the account at `index`.
    pub fn account(&self, index: u32) -> Result<Wallet, WalletError> {
        self.wallet.account(index)
    }

    /// Derives the account selected by the first four bytes of `account_id`.
    pub fn get_account(&self, account_id: &[u8]) -> Result<Wallet, WalletError> {
        self.wallet.get_account(account_id)
    }

    /// Derives an account at a random non-hardened index.
    pub fn new_account<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Wallet, WalletError> {
        self.account(rng.next_u32() & ACCOUNT_INDEX_MASK)
    }

    /// Whether `candidate` is an account of this master wallet.
    pub fn has_account(&self, candidate: &ExtendedKey) -> Result<bool, WalletError> {
        self.wallet.has_account(candidate)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    // Seed of the BIP39 mnemonic "abandon abandon ... about" with an empty passphrase.
    const BIP84_SEED: &str = "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4";
    const BIP84_ACCOUNT_XPUB: &str = "xpub6CatWdiZiodmUeTDp8LT5or8nmbKNcuyvz7WyksVFkKB4RHwCD3XyuvPEbvqAQY3rAPshWcMLoP2fMFMKHPJ4ZeZXYVUhLv1VMrjPC7PW6V";
    const BIP84_FIRST_ADDRESS: &str = "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu";

    // First receive address of the all-zero 32-byte seed.
    const ZERO_SEED_FIRST_ADDRESS: &str = "bc1qv6chrkpdrw4laa00zz2e3y7qq66gx6neflyax5";

    fn zero_seed_account() -> Wallet {
        MasterWallet::from_seed(&[0u8; 32], Network::Bitcoin)
            .unwrap()
            .account(0)
            .unwrap()
    }

    #[test]
    fn bip84_vector() {
        let seed = hex::decode(BIP84_SEED).unwrap();
        let master = MasterWallet::from_seed(&seed, Network::Bitcoin).unwrap();
        assert_eq!(master.wallet().key().to_string(), BIP84_ACCOUNT_XPUB);

        let mut account = master.account(0).unwrap();
        assert_eq!(
            account.get_address(0, AddressFormat::P2wpkh).unwrap(),
            BIP84_FIRST_ADDRESS
        );
    }

    #[test]
    fn zero_seed_address_is_pinned_and_cached_once() {
        let mut wallet = zero_seed_account();
        let first = wallet.get_address(0, AddressFormat::P2wpkh).unwrap();
        let second = wallet.get_address(0, AddressFormat::P2wpkh).unwrap();

        assert_eq!(first, ZERO_SEED_FIRST_ADDRESS);
        assert_eq!(first, second);
        assert_eq!(
            wallet.addresses().iter().collect::<Vec<_>>(),
            [ZERO_SEED_FIRST_ADDRESS]
        );
    }

    #[test]
    fn address_cache_is_an_ordered_set() {
        let mut wallet = zero_seed_account();
        let order = [3, 1, 3, 0, 1, 3];
        for index in order {
            wallet.get_address(index, AddressFormat::P2wpkh).unwrap();
        }

        let mut expected = zero_seed_account();
        let expected: Vec<String> = [3, 1, 0]
            .into_iter()
            .map(|index| expected.get_address(index, AddressFormat::P2wpkh).unwrap())
            .collect();

        assert_eq!(wallet.addresses().len(), 3);
        assert!(wallet.addresses().iter().eq(expected.iter()));

        // A hit on the cache must not grow it either.
        let probed = wallet.addresses().len();
        assert!(wallet.has_address(&expected[0], 1).unwrap());
        assert_eq!(wallet.addresses().len(), probed);
    }

    #[test]
    fn seed_length_is_checked() {
        for len in [0, 15, 65] {
            assert!(matches!(
                MasterWallet::from_seed(&vec![1u8; len], Network::Bitcoin),
                Err(WalletError::Validation(ValidationError::InvalidSeedLength(l))) if l == len
            ));
        }
        assert!(MasterWallet::from_seed(&[1u8; 16], Network::Regtest).is_ok());
        assert!(MasterWallet::from_seed(&[1u8; 64], Network::Regtest).is_ok());
    }

    #[test]
    fn test_networks_use_a_different_coin_type() {
        let main = MasterWallet::from_seed(&[3u8; 32], Network::Bitcoin).unwrap();
        let test = MasterWallet::from_seed(&[3u8; 32], Network::Testnet).unwrap();
        assert_ne!(
            main.wallet().key().public_key(),
            test.wallet().key().public_key()
        );
        assert!(test.wallet().key().to_string().starts_with("tpub"));
    }

    #[test]
    fn new_address_advances_the_counter() {
        let mut wallet = zero_seed_account();
        assert_eq!(wallet.index(), 0);

        let first = wallet.new_address(AddressFormat::P2wpkh).unwrap();
        assert_eq!(wallet.index(), 1);
        assert_eq!(first, wallet.get_address(1, AddressFormat::P2wpkh).unwrap());

        wallet.new_address(AddressFormat::P2tr).unwrap();
        assert_eq!(wallet.index(), 2);
        assert_eq!(wallet.addresses().len(), 2);
    }

    #[test]
    fn failed_derivation_leaves_state_untouched() {
        let mut wallet = zero_seed_account()
            .neutered()
            .with_start_index(HARDENED_OFFSET - 1);

        assert!(wallet.new_address(AddressFormat::P2wpkh).is_err());
        assert_eq!(wallet.index(), HARDENED_OFFSET - 1);
        assert!(wallet.addresses().is_empty());
    }

    #[test]
    fn has_address_probes_and_caches() {
        let mut source = zero_seed_account();
        let target = source.get_address(5, AddressFormat::P2pkh).unwrap();

        let mut wallet = zero_seed_account();
        assert!(wallet.has_address(&target, DEFAULT_ADDRESS_LIMIT).unwrap());
        assert_eq!(wallet.addresses().len(), 6);

        // Outside the probing window.
        let mut short = zero_seed_account();
        assert!(!short.has_address(&target, 5).unwrap());

        // Foreign address of the right shape.
        let mut other = MasterWallet::from_seed(&[7u8; 32], Network::Bitcoin)
            .unwrap()
            .account(0)
            .unwrap();
        let foreign = other.get_address(0, AddressFormat::P2wpkh).unwrap();
        assert!(!wallet.has_address(&foreign, 10).unwrap());

        // Different network.
        assert!(!wallet
            .has_address("tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx", 10)
            .unwrap());

        assert!(wallet.has_address("garbage", 10).is_err());
    }

    #[test]
    fn accounts() {
        let master = MasterWallet::from_seed(&[0u8; 32], Network::Bitcoin).unwrap();

        let by_id = master.get_account(&[0x80, 0, 0, 7, 0xff]).unwrap();
        assert_eq!(by_id.key().index(), 7);
        assert!(master.has_account(by_id.key()).unwrap());
        assert!(master.has_account(&by_id.key().neutered()).unwrap());

        let random = master.new_account(&mut StdRng::seed_from_u64(9)).unwrap();
        assert!(random.key().index() < HARDENED_OFFSET);
        assert!(master.has_account(random.key()).unwrap());

        let stranger = MasterWallet::from_seed(&[1u8; 32], Network::Bitcoin)
            .unwrap()
            .account(7)
            .unwrap();
        assert!(!master.has_account(stranger.key()).unwrap());

        assert!(master.get_account(&[1, 2, 3]).is_err());
    }

    #[test]
    fn has_pubkey_scans_children() {
        let wallet = zero_seed_account();
        let child = wallet.key().derive_child(3).unwrap();
        assert!(wallet.has_pubkey(&child.public_key(), 10).unwrap());
        assert!(!wallet.has_pubkey(&child.public_key(), 3).unwrap());
    }

    #[test]
    fn summary_serializes() {
        let wallet = zero_seed_account();
        let summary = wallet.summary();
        assert_eq!(summary.depth, 4);
        assert_eq!(summary.index, 0);
        assert_eq!(summary.pfp, wallet.key().parent_fingerprint().to_string());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["xpub"], wallet.key().to_string());
    }
}
