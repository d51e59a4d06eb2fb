//! # Medregistrar - Batch registration utility for patient medical record ledgers
//!
//! This library loads a registrar configuration (network definitions, sender
//! identity, contract reference, compiler/tooling options) and an ordered
//! JSON list of patient records, then submits one on-chain registration per
//! record to an already-deployed `PatientMedicalRecordSystem` contract.
//!
//! ## Overview
//!
//! Submission is strictly sequential: every transaction is confirmed before
//! the next record is touched, so a run never has two registrations in
//! flight. On networks flagged as simulated ledgers (local development
//! nodes whose blocks are not produced automatically) the runner mines a
//! fixed number of synthetic blocks after each registration to emulate real
//! confirmation latency.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `config`: Type-safe configuration structures and validation
//! - `config_loader`: Configuration file loading and network selection
//! - `records`: Patient record input parsing
//! - `ledger`: The contract seam ([`ledger::RecordLedger`]) and its
//!   web3-backed implementation
//! - `runner`: The sequential batch registration runner
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use medregistrar::ledger::eth::Web3Ledger;
//! use medregistrar::runner::{self, BatchOptions};
//! use medregistrar::{config_loader, records};
//! use std::path::Path;
//!
//! # async fn run() -> color_eyre::Result<()> {
//! let config = config_loader::load_config(Path::new("config.yaml"))?;
//! let (_, network) = config_loader::select_network(&config, None)?;
//! let patients = records::load_records(Path::new("patients.json"))?;
//!
//! let ledger = Web3Ledger::connect(network, &config.contract).await?;
//! let options = BatchOptions::for_network(network);
//! let report = runner::run_registration_batch(&ledger, &patients, &options).await?;
//!
//! println!("registered {} patient(s)", report.registered());
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration Format
//!
//! Configurations use YAML format:
//!
//! ```yaml
//! default_network: localhost
//!
//! networks:
//!   localhost:
//!     url: "http://127.0.0.1:8545"
//!     chain_id: 31337
//!     simulated_ledger: true
//!     contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3"
//!
//! contract:
//!   name: PatientMedicalRecordSystem
//!   abi_path: abi/PatientMedicalRecordSystem.json
//! ```
//!
//! ## Error Handling
//!
//! Library-level failures are typed (`thiserror` enums such as
//! [`ledger::LedgerError`] and [`runner::RunnerError`]); the binary boundary
//! uses `color_eyre` for reporting. A run is all-or-stop: the first failure
//! aborts it, and registrations confirmed before the failure remain applied
//! on the ledger.

pub mod config;
pub mod config_loader;
pub mod ledger;
pub mod records;
pub mod runner;
