use crate::config::{Config, NetworkConfig};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse the registrar configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading registrar configuration from: {:?}", config_path);

    // Open the configuration file
    let file = File::open(config_path)?;

    // Parse the YAML content
    let config: Config = serde_yaml::from_reader(file)?;

    // Validate the configuration
    config.validate()?;

    info!(
        "Loaded {} network definition(s), contract '{}'",
        config.networks.len(),
        config.contract.name
    );

    Ok(config)
}

/// Resolve the network to submit on. A CLI-requested name overrides the
/// configured `default_network`.
pub fn select_network<'a>(
    config: &'a Config,
    requested: Option<&str>,
) -> Result<(&'a str, &'a NetworkConfig)> {
    let name = requested.unwrap_or(&config.default_network);

    match config.networks.get_key_value(name) {
        Some((name, network)) => {
            info!("Selected network '{}' (chain id {})", name, network.chain_id);
            if network.simulated_ledger {
                info!(
                    "Network '{}' is a simulated ledger; blocks will be mined synthetically",
                    name
                );
            }
            Ok((name.as_str(), network))
        }
        None => {
            let mut known: Vec<&str> = config.networks.keys().map(String::as_str).collect();
            known.sort_unstable();
            Err(eyre!(
                "Unknown network '{}'; configured networks: {}",
                name,
                known.join(", ")
            ))
        }
    }
}
