use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level registrar configuration
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Network used when the CLI does not request one explicitly
    pub default_network: String,
    pub networks: HashMap<String, NetworkConfig>,
    pub contract: ContractConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooling: Option<ToolingConfig>,
}

/// Per-network connection and submission settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint of the node
    pub url: String,
    pub chain_id: u64,
    /// Confirmation depth to wait for after each submission
    #[serde(default = "default_confirmations")]
    pub confirmations: usize,
    /// Whether this network is a local simulated ledger whose blocks must
    /// be produced synthetically after each registration
    #[serde(default)]
    pub simulated_ledger: bool,
    /// Sender account for registration transactions. When absent, the
    /// node's first unlocked account is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_account: Option<String>,
    /// Address of the deployed medical record contract on this network
    pub contract_address: String,
}

fn default_confirmations() -> usize {
    1
}

/// Reference to the deployed contract's interface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractConfig {
    pub name: String,
    /// Path to the JSON ABI describing the registration entry point
    pub abi_path: PathBuf,
}

/// Compiler and reporting options carried alongside the network
/// definitions. The batch runner does not consume these; they document the
/// toolchain the deployment was built with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolingConfig {
    #[serde(default = "default_solidity_version")]
    pub solidity_version: String,
    #[serde(default)]
    pub gas_report: bool,
}

fn default_solidity_version() -> String {
    "0.8.7".to_string()
}

impl Default for ToolingConfig {
    fn default() -> Self {
        Self {
            solidity_version: default_solidity_version(),
            gas_report: false,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid network configuration: {0}")]
    InvalidNetwork(String),
    #[error("Invalid contract configuration: {0}")]
    InvalidContract(String),
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.networks.is_empty() {
            return Err(ValidationError::InvalidNetwork(
                "at least one network must be configured".to_string(),
            ));
        }

        if !self.networks.contains_key(&self.default_network) {
            return Err(ValidationError::InvalidGeneral(format!(
                "default_network '{}' is not a configured network",
                self.default_network
            )));
        }

        for (name, network) in &self.networks {
            if network.url.is_empty() {
                return Err(ValidationError::InvalidNetwork(format!(
                    "network '{}': url cannot be empty",
                    name
                )));
            }
            if network.chain_id == 0 {
                return Err(ValidationError::InvalidNetwork(format!(
                    "network '{}': chain_id cannot be zero",
                    name
                )));
            }
            if network.confirmations == 0 {
                return Err(ValidationError::InvalidNetwork(format!(
                    "network '{}': confirmations must be at least 1",
                    name
                )));
            }
            Self::validate_address_shape(name, "contract_address", &network.contract_address)?;
            if let Some(account) = &network.from_account {
                Self::validate_address_shape(name, "from_account", account)?;
            }
        }

        if self.contract.name.is_empty() {
            return Err(ValidationError::InvalidContract(
                "contract name cannot be empty".to_string(),
            ));
        }
        if self.contract.abi_path.as_os_str().is_empty() {
            return Err(ValidationError::InvalidContract(
                "contract abi_path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Check that a configured account value looks like a 20-byte hex address
    fn validate_address_shape(
        network: &str,
        field: &str,
        value: &str,
    ) -> Result<(), ValidationError> {
        let hex = value.strip_prefix("0x").unwrap_or(value);
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidNetwork(format!(
                "network '{}': {} '{}' is not a 20-byte hex address",
                network, field, value
            )));
        }
        Ok(())
    }
}
