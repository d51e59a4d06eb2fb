//! Web3-backed ledger implementation.
//!
//! Talks JSON-RPC to an Ethereum-compatible node over HTTP. Transactions
//! are signed by the node itself (`eth_sendTransaction`); this utility never
//! touches key material. Synthetic blocks on simulated ledgers are produced
//! with the dev-node `evm_mine` call.

use crate::config::{ContractConfig, NetworkConfig};
use crate::ledger::{LedgerError, RecordLedger, RegistrationReceipt};
use crate::records::PatientRecord;
use async_trait::async_trait;
use log::{debug, info};
use std::time::Duration;
use web3::contract::{Contract, Options};
use web3::transports::Http;
use web3::types::Address;
use web3::{Transport, Web3};

/// Name of the registration entry point in the contract ABI
const REGISTER_FUNCTION: &str = "registerPatient";

/// Live connection to the deployed medical record contract
pub struct Web3Ledger {
    web3: Web3<Http>,
    contract: Contract<Http>,
    from: Address,
    confirmations: usize,
}

impl Web3Ledger {
    /// Connect to the node described by `network` and bind the deployed
    /// contract. The sender account comes from the configuration or, when
    /// unset, from the node's first unlocked account.
    pub async fn connect(
        network: &NetworkConfig,
        contract: &ContractConfig,
    ) -> Result<Self, LedgerError> {
        let transport = Http::new(&network.url)?;
        let web3 = Web3::new(transport);

        let abi = std::fs::read(&contract.abi_path).map_err(|source| LedgerError::AbiFile {
            path: contract.abi_path.display().to_string(),
            source,
        })?;
        let contract_address = parse_address(&network.contract_address)?;
        let contract = Contract::from_json(web3.eth(), contract_address, &abi)?;

        let from = match &network.from_account {
            Some(account) => parse_address(account)?,
            None => web3
                .eth()
                .accounts()
                .await?
                .into_iter()
                .next()
                .ok_or(LedgerError::NoAccounts)?,
        };

        info!(
            "Connected to {} (contract {:#x}, sender {:#x})",
            network.url, contract_address, from
        );

        Ok(Self {
            web3,
            contract,
            from,
            confirmations: network.confirmations,
        })
    }
}

#[async_trait]
impl RecordLedger for Web3Ledger {
    async fn register_patient(
        &self,
        patient: &PatientRecord,
    ) -> Result<RegistrationReceipt, LedgerError> {
        // Argument order is fixed by the contract signature
        let params = (
            parse_address(&patient.patient_address)?,
            patient.name.clone(),
            patient.profile_picture.clone(),
            patient.dob.clone(),
            patient.phone_number.clone(),
            patient.blood_group.clone(),
        );

        let receipt = self
            .contract
            .call_with_confirmations(
                REGISTER_FUNCTION,
                params,
                self.from,
                Options::default(),
                self.confirmations,
            )
            .await?;

        if matches!(receipt.status, Some(status) if status.is_zero()) {
            return Err(LedgerError::Rejected(format!(
                "{:#x}",
                receipt.transaction_hash
            )));
        }

        Ok(RegistrationReceipt {
            transaction_hash: format!("{:#x}", receipt.transaction_hash),
            block_number: receipt.block_number.map(|block| block.as_u64()),
        })
    }

    async fn advance_chain(&self, blocks: u64, delay: Duration) -> Result<(), LedgerError> {
        for mined in 0..blocks {
            self.web3.transport().execute("evm_mine", vec![]).await?;
            debug!("Mined synthetic block {}/{}", mined + 1, blocks);
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}

/// Parse a hex account string, with or without the `0x` prefix
fn parse_address(input: &str) -> Result<Address, LedgerError> {
    input
        .trim()
        .trim_start_matches("0x")
        .parse()
        .map_err(|_| LedgerError::InvalidAddress(input.to_string()))
}
