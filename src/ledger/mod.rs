//! Interface to the external medical record ledger.
//!
//! The contract's internals are opaque to this utility: the only operations
//! it relies on are submitting a registration and, on simulated ledgers,
//! producing synthetic blocks. Both sit behind the [`RecordLedger`] trait so
//! the batch runner can be driven against a real node or a test double.

pub mod eth;

use crate::records::PatientRecord;
use async_trait::async_trait;
use std::time::Duration;

/// Handle returned once a registration has reached its confirmation depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub transaction_hash: String,
    /// Block the transaction was included in, when the node reports it
    pub block_number: Option<u64>,
}

/// Ledger operation errors
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger transport error: {0}")]
    Transport(#[from] web3::Error),
    #[error("invalid contract ABI: {0}")]
    Abi(#[from] web3::ethabi::Error),
    #[error("failed to read contract ABI from '{path}': {source}")]
    AbiFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid account address '{0}'")]
    InvalidAddress(String),
    #[error("no unlocked accounts available on the node")]
    NoAccounts,
    #[error("transaction {0} was rejected by the contract")]
    Rejected(String),
}

/// The external contract seam used by the batch runner
#[async_trait]
pub trait RecordLedger: Send + Sync {
    /// Submit one patient registration and wait until it has reached the
    /// ledger's configured confirmation depth.
    async fn register_patient(
        &self,
        patient: &PatientRecord,
    ) -> Result<RegistrationReceipt, LedgerError>;

    /// Advance a simulated ledger by `blocks` synthetic blocks, pausing
    /// `delay` after each one. Only meaningful on local test networks.
    async fn advance_chain(&self, blocks: u64, delay: Duration) -> Result<(), LedgerError>;
}
