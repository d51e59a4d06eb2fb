use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use medregistrar::config_loader;
use medregistrar::ledger::eth::Web3Ledger;
use medregistrar::records;
use medregistrar::runner::{self, BatchOptions};

/// Batch registration utility for patient medical record ledger deployments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the registrar configuration YAML file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Path to the JSON file listing the patient records to register
    #[arg(short, long, default_value = "patients.json")]
    records: PathBuf,

    /// Network to submit on (overrides default_network from the configuration)
    #[arg(short, long)]
    network: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting patient registration batch");
    info!("Configuration file: {:?}", args.config);
    info!("Patient records file: {:?}", args.records);

    let config = config_loader::load_config(&args.config)?;
    let (network_name, network) = config_loader::select_network(&config, args.network.as_deref())?;
    let patients = records::load_records(&args.records)?;

    let ledger = Web3Ledger::connect(network, &config.contract).await?;
    let options = BatchOptions::for_network(network);
    let report = runner::run_registration_batch(&ledger, &patients, &options).await?;

    info!(
        "Registered {} patient(s) on '{}'",
        report.registered(),
        network_name
    );

    Ok(())
}
