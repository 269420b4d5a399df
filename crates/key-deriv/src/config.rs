//! Wallet configuration.

use bitcoin::Network;
use serde::{Deserialize, Serialize};

use crate::{address::AddressFormat, wallet::DEFAULT_ADDRESS_LIMIT};

/// Settings applied when building wallets and materializing addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Network addresses are encoded for.
    pub network: Network,

    /// Address format used when none is given.
    pub address_format: AddressFormat,

    /// Number of indexes probed by address membership checks.
    pub address_limit: u32,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            network: Network::Bitcoin,
            address_format: AddressFormat::default(),
            address_limit: DEFAULT_ADDRESS_LIMIT,
        }
    }
}
