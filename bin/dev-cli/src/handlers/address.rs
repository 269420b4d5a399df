//! Derives or checks wallet addresses.

use anyhow::Result;
use bitcoin::NetworkKind;
use hdcred_key_deriv::{ExtendedKey, Wallet};
use tracing::info;

use crate::{cli::AddressArgs, config::CliConfig};

/// Handles the address command.
pub(crate) fn handle_address(args: AddressArgs, config: &CliConfig) -> Result<()> {
    let key: ExtendedKey = args.xpub.parse()?;

    // Keep the configured network when it agrees with the key's version bytes.
    let network = if NetworkKind::from(config.wallet.network) == key.network() {
        config.wallet.network
    } else {
        key.default_network()
    };
    let mut wallet = Wallet::new(key, network);

    match args.check {
        Some(address) => {
            let found = wallet.has_address(&address, config.wallet.address_limit)?;
            info!(%address, %found, probed = wallet.addresses().len(), "checked address");
            println!("{found}");
        }
        None => {
            let format = args.format.unwrap_or(config.wallet.address_format);
            println!("{}", wallet.get_address(args.index, format)?);
        }
    }

    Ok(())
}
