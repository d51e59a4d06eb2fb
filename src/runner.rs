//! Batch registration runner.
//!
//! Submits one registration per patient record, strictly sequentially and in
//! input order. Each submission is confirmed before the next one starts, so
//! no two registrations are ever in flight at once. On a simulated ledger a
//! fixed synthetic chain advance follows each confirmed registration to
//! emulate real confirmation latency.
//!
//! There is no retry, no rollback and no per-record recovery: the first
//! failure aborts the run, and registrations confirmed before it remain
//! applied on the ledger.

use crate::config::NetworkConfig;
use crate::ledger::{LedgerError, RecordLedger, RegistrationReceipt};
use crate::records::PatientRecord;
use log::{debug, info};
use std::time::Duration;

/// Synthetic blocks mined after each registration on a simulated ledger
pub const SYNTHETIC_ADVANCE_BLOCKS: u64 = 2;

/// Pause between synthetic blocks
pub const SYNTHETIC_ADVANCE_DELAY: Duration = Duration::from_millis(1000);

/// Runner settings derived from the selected network
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Mine synthetic blocks after each registration
    pub simulated_ledger: bool,
    pub advance_blocks: u64,
    pub advance_delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            simulated_ledger: false,
            advance_blocks: SYNTHETIC_ADVANCE_BLOCKS,
            advance_delay: SYNTHETIC_ADVANCE_DELAY,
        }
    }
}

impl BatchOptions {
    pub fn for_network(network: &NetworkConfig) -> Self {
        Self {
            simulated_ledger: network.simulated_ledger,
            ..Self::default()
        }
    }
}

/// Receipts collected over a fully successful run, in submission order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub receipts: Vec<RegistrationReceipt>,
}

impl BatchReport {
    pub fn registered(&self) -> usize {
        self.receipts.len()
    }
}

/// Batch runner errors, naming the record the run stopped at
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("registration failed for patient '{name}' (record {index}): {source}")]
    Registration {
        index: usize,
        name: String,
        source: LedgerError,
    },
    #[error("chain advance failed after registering patient '{name}' (record {index}): {source}")]
    ChainAdvance {
        index: usize,
        name: String,
        source: LedgerError,
    },
}

/// Register every patient record, in input order, one at a time.
///
/// An empty record list is a successful no-op. On the first failure the
/// remaining records are not submitted and the error identifies the record
/// the run stopped at.
pub async fn run_registration_batch<L: RecordLedger + ?Sized>(
    ledger: &L,
    records: &[PatientRecord],
    options: &BatchOptions,
) -> Result<BatchReport, RunnerError> {
    let mut report = BatchReport::default();

    for (index, patient) in records.iter().enumerate() {
        info!(
            "Registering patient '{}' ({}/{})",
            patient.name,
            index + 1,
            records.len()
        );
        debug!("{:?}", patient);

        let receipt = ledger
            .register_patient(patient)
            .await
            .map_err(|source| RunnerError::Registration {
                index,
                name: patient.name.clone(),
                source,
            })?;

        info!(
            "Patient {} added to the medical record system (tx {})",
            patient.name, receipt.transaction_hash
        );

        if options.simulated_ledger {
            ledger
                .advance_chain(options.advance_blocks, options.advance_delay)
                .await
                .map_err(|source| RunnerError::ChainAdvance {
                    index,
                    name: patient.name.clone(),
                    source,
                })?;
        }

        report.receipts.push(receipt);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Register(PatientRecord),
        Advance { blocks: u64, delay: Duration },
    }

    /// Test double that records every ledger call and can be told to fail
    /// the n-th registration.
    struct RecordingLedger {
        calls: Mutex<Vec<Call>>,
        fail_registration_at: Option<usize>,
    }

    impl RecordingLedger {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_registration_at: None,
            }
        }

        fn failing_at(index: usize) -> Self {
            Self {
                fail_registration_at: Some(index),
                ..Self::new()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn registrations(&self) -> Vec<PatientRecord> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    Call::Register(record) => Some(record),
                    Call::Advance { .. } => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl RecordLedger for RecordingLedger {
        async fn register_patient(
            &self,
            patient: &PatientRecord,
        ) -> Result<RegistrationReceipt, LedgerError> {
            let mut calls = self.calls.lock().unwrap();
            let submitted = calls
                .iter()
                .filter(|call| matches!(call, Call::Register(_)))
                .count();
            if self.fail_registration_at == Some(submitted) {
                return Err(LedgerError::Rejected("0xdead".to_string()));
            }
            calls.push(Call::Register(patient.clone()));
            Ok(RegistrationReceipt {
                transaction_hash: format!("0x{:064x}", submitted + 1),
                block_number: Some(submitted as u64 + 1),
            })
        }

        async fn advance_chain(&self, blocks: u64, delay: Duration) -> Result<(), LedgerError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Advance { blocks, delay });
            Ok(())
        }
    }

    fn patient(address: &str, name: &str) -> PatientRecord {
        PatientRecord {
            patient_address: address.to_string(),
            name: name.to_string(),
            profile_picture: format!("https://records.example/{}.png", name),
            dob: "1990-04-12".to_string(),
            phone_number: "5550101".to_string(),
            blood_group: "O+".to_string(),
        }
    }

    #[tokio::test]
    async fn test_registers_every_record_in_input_order() {
        let ledger = RecordingLedger::new();
        let records = vec![
            patient("0xA", "Alice"),
            patient("0xB", "Bola"),
            patient("0xC", "Chidi"),
        ];

        let report = run_registration_batch(&ledger, &records, &BatchOptions::default())
            .await
            .unwrap();

        assert_eq!(report.registered(), 3);
        assert_eq!(ledger.registrations(), records);
    }

    #[tokio::test]
    async fn test_all_six_fields_pass_through_unchanged() {
        let ledger = RecordingLedger::new();
        let record = PatientRecord {
            patient_address: "0xA".to_string(),
            name: "Alice".to_string(),
            profile_picture: "u1".to_string(),
            dob: "2000-01-01".to_string(),
            phone_number: "555".to_string(),
            blood_group: "O+".to_string(),
        };

        run_registration_batch(&ledger, &[record.clone()], &BatchOptions::default())
            .await
            .unwrap();

        assert_eq!(ledger.calls(), vec![Call::Register(record)]);
    }

    #[tokio::test]
    async fn test_empty_input_is_a_successful_noop() {
        let ledger = RecordingLedger::new();

        let report = run_registration_batch(&ledger, &[], &BatchOptions::default())
            .await
            .unwrap();

        assert_eq!(report.registered(), 0);
        assert!(ledger.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_stops_the_batch() {
        let ledger = RecordingLedger::failing_at(1);
        let records = vec![
            patient("0xA", "Alice"),
            patient("0xB", "Bola"),
            patient("0xC", "Chidi"),
        ];

        let err = run_registration_batch(&ledger, &records, &BatchOptions::default())
            .await
            .unwrap_err();

        match err {
            RunnerError::Registration { index, name, .. } => {
                assert_eq!(index, 1);
                assert_eq!(name, "Bola");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Only the first record was ever submitted
        assert_eq!(ledger.registrations(), records[..1].to_vec());
    }

    #[tokio::test]
    async fn test_no_chain_advance_on_real_networks() {
        let ledger = RecordingLedger::new();
        let records = vec![patient("0xA", "Alice"), patient("0xB", "Bola")];

        run_registration_batch(&ledger, &records, &BatchOptions::default())
            .await
            .unwrap();

        assert!(ledger
            .calls()
            .iter()
            .all(|call| matches!(call, Call::Register(_))));
    }

    #[tokio::test]
    async fn test_one_chain_advance_per_registration_on_simulated_ledger() {
        let ledger = RecordingLedger::new();
        let records = vec![patient("0xA", "Alice"), patient("0xB", "Bola")];
        let options = BatchOptions {
            simulated_ledger: true,
            ..BatchOptions::default()
        };

        run_registration_batch(&ledger, &records, &options)
            .await
            .unwrap();

        let advance = Call::Advance {
            blocks: SYNTHETIC_ADVANCE_BLOCKS,
            delay: SYNTHETIC_ADVANCE_DELAY,
        };
        assert_eq!(
            ledger.calls(),
            vec![
                Call::Register(records[0].clone()),
                advance.clone(),
                Call::Register(records[1].clone()),
                advance,
            ]
        );
    }

    #[tokio::test]
    async fn test_single_record_simulation_scenario() {
        let ledger = RecordingLedger::new();
        let record = PatientRecord {
            patient_address: "0xA".to_string(),
            name: "Alice".to_string(),
            profile_picture: "u1".to_string(),
            dob: "2000-01-01".to_string(),
            phone_number: "555".to_string(),
            blood_group: "O+".to_string(),
        };
        let options = BatchOptions {
            simulated_ledger: true,
            ..BatchOptions::default()
        };

        let report = run_registration_batch(&ledger, &[record.clone()], &options)
            .await
            .unwrap();

        assert_eq!(report.registered(), 1);
        assert_eq!(
            ledger.calls(),
            vec![
                Call::Register(record),
                Call::Advance {
                    blocks: 2,
                    delay: Duration::from_millis(1000),
                },
            ]
        );
    }

    #[test]
    fn test_options_follow_the_network_flag() {
        let network = NetworkConfig {
            url: "http://127.0.0.1:8545".to_string(),
            chain_id: 31337,
            confirmations: 1,
            simulated_ledger: true,
            from_account: None,
            contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
        };

        let options = BatchOptions::for_network(&network);
        assert!(options.simulated_ledger);
        assert_eq!(options.advance_blocks, SYNTHETIC_ADVANCE_BLOCKS);
        assert_eq!(options.advance_delay, SYNTHETIC_ADVANCE_DELAY);
    }
}
