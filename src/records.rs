//! Patient record input.
//!
//! Records arrive as a JSON array and are read-only input to the batch
//! runner: loaded once at startup, never mutated, never written back. The
//! field names match the registration fixtures produced by the deployment
//! tooling, hence the camelCase renames.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// The six-field patient descriptor submitted to the registration contract.
///
/// Field order here is the submission order and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    /// Account identifier the record is registered under
    pub patient_address: String,
    pub name: String,
    pub profile_picture: String,
    /// Date of birth; fixtures carry either a string or a bare number
    #[serde(deserialize_with = "string_or_number")]
    pub dob: String,
    #[serde(deserialize_with = "string_or_number")]
    pub phone_number: String,
    pub blood_group: String,
}

/// Accept either a JSON string or a JSON number, normalized to `String`
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Load the ordered patient record list from a JSON file
pub fn load_records(records_path: &Path) -> Result<Vec<PatientRecord>> {
    info!("Loading patient records from: {:?}", records_path);

    let file = File::open(records_path).wrap_err_with(|| {
        format!(
            "Failed to open patient records file '{}'",
            records_path.display()
        )
    })?;

    let records: Vec<PatientRecord> =
        serde_json::from_reader(file).wrap_err("Failed to parse patient records JSON")?;

    if records.is_empty() {
        warn!("Patient records file is empty; nothing to register");
    } else {
        info!("Loaded {} patient record(s)", records.len());
    }

    Ok(records)
}
