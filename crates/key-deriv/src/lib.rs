//! Key identities, BIP32 extended keys and wallets.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bitcoin::Network;
//! use hdcred_key_deriv::{AddressFormat, KeyPair, MasterWallet};
//!
//! // Flat identities
//! let root = KeyPair::generate(&mut rand::thread_rng());
//! let child = root.derive(&[7u8; 32])?;
//! assert!(root.is_child(&[7u8; 32], &child.public_key()));
//!
//! // Hierarchical wallets
//! let master = MasterWallet::from_seed(&seed, Network::Bitcoin)?;
//! let mut account = master.account(0)?;
//! let address = account.get_address(0, AddressFormat::P2wpkh)?;
//! ```

pub mod address;
pub mod config;
pub mod errors;
pub mod extended;
pub mod keypair;
pub mod wallet;

// Internal module - paths are obscured to prevent direct usage and ensure consistency
mod paths;

pub use address::{decode_address, encode_address, p2tr_address, AddressFormat, DecodedAddress};
pub use config::WalletConfig;
pub use errors::WalletError;
pub use extended::{ExtendedKey, HARDENED_OFFSET};
pub use keypair::KeyPair;
pub use wallet::{MasterWallet, Wallet, WalletSummary, DEFAULT_ADDRESS_LIMIT};
