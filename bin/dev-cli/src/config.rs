use std::{fs, path::Path};

use anyhow::anyhow;
use hdcred_key_deriv::WalletConfig;
use hdcred_proof::ProofPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct CliConfig {
    pub(crate) wallet: WalletConfig,

    pub(crate) policy: ProofPolicy,
}

impl CliConfig {
    pub(crate) fn from_path(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| anyhow!(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }
}
