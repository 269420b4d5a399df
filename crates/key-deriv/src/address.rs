//! Address encoding and decoding.
//!
//! Wallet nodes materialize as P2PKH, P2WPKH or key-path-only P2TR addresses.

use std::{fmt, str::FromStr};

use bitcoin::{
    address::NetworkUnchecked, key::TapTweak, Address, AddressType, CompressedPublicKey, Network,
    XOnlyPublicKey,
};
use hdcred_primitives::errors::ValidationError;
use secp256k1::{PublicKey, SECP256K1};
use serde::{Deserialize, Serialize};

/// Networks probed, in order, when decoding an address of unknown origin.
const DECODE_NETWORKS: [Network; 4] = [
    Network::Bitcoin,
    Network::Testnet,
    Network::Signet,
    Network::Regtest,
];

/// Supported address encodings for a single public key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFormat {
    /// Pay to public key hash.
    P2pkh,

    /// Pay to witness public key hash.
    #[default]
    #[serde(alias = "p2w-pkh")]
    P2wpkh,

    /// Pay to taproot, key path only.
    P2tr,
}

impl fmt::Display for AddressFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::P2pkh => "p2pkh",
            Self::P2wpkh => "p2wpkh",
            Self::P2tr => "p2tr",
        })
    }
}

impl FromStr for AddressFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "p2pkh" => Ok(Self::P2pkh),
            "p2wpkh" | "p2w-pkh" => Ok(Self::P2wpkh),
            "p2tr" => Ok(Self::P2tr),
            other => Err(ValidationError::InvalidAddress(format!(
                "unknown address format: {other}"
            ))),
        }
    }
}

/// Generate a P2TR address from an x-only public key.
///
/// Uses key-path spending only (no script tree).
#[must_use]
pub fn p2tr_address(pubkey: XOnlyPublicKey, network: Network) -> Address {
    let (tweaked, _) = pubkey.tap_tweak(SECP256K1, None);
    Address::p2tr_tweaked(tweaked, network)
}

/// Encodes `point` as an address of the given format on `network`.
pub fn encode_address(point: &PublicKey, format: AddressFormat, network: Network) -> Address {
    let compressed = CompressedPublicKey(*point);
    match format {
        AddressFormat::P2pkh => Address::p2pkh(compressed.pubkey_hash(), network),
        AddressFormat::P2wpkh => Address::p2wpkh(&compressed, network),
        AddressFormat::P2tr => p2tr_address(point.x_only_public_key().0, network),
    }
}

/// An address broken back into its components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAddress {
    /// Address format.
    pub format: AddressFormat,

    /// The first network, in the order mainnet, testnet, signet, regtest, whose encoding accepts
    /// the address. Testnet and signet share encodings, so signet addresses decode as testnet.
    pub network: Network,

    /// The 20-byte key hash for P2PKH/P2WPKH, or the 32-byte tweaked output key for P2TR.
    pub payload: Vec<u8>,
}

/// Decodes an address string into its format, network and payload.
pub fn decode_address(address: &str) -> Result<DecodedAddress, ValidationError> {
    let unchecked: Address<NetworkUnchecked> = address
        .parse()
        .map_err(|e| ValidationError::InvalidAddress(format!("{address}: {e}")))?;

    let network = DECODE_NETWORKS
        .into_iter()
        .find(|network| unchecked.is_valid_for_network(*network))
        .ok_or_else(|| ValidationError::InvalidAddress(format!("{address}: unknown network")))?;

    let checked = unchecked.assume_checked();
    let script = checked.script_pubkey();
    let (format, range) = match checked.address_type() {
        Some(AddressType::P2pkh) => (AddressFormat::P2pkh, 3..23),
        Some(AddressType::P2wpkh) => (AddressFormat::P2wpkh, 2..22),
        Some(AddressType::P2tr) => (AddressFormat::P2tr, 2..34),
        _ => {
            return Err(ValidationError::InvalidAddress(format!(
                "{address}: unsupported address type"
            )))
        }
    };

    let payload = script
        .as_bytes()
        .get(range)
        .ok_or_else(|| ValidationError::InvalidAddress(format!("{address}: truncated script")))?
        .to_vec();

    Ok(DecodedAddress {
        format,
        network,
        payload,
    })
}
