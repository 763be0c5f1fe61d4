//! The deployment record written at the end of a successful run

use std::{fs, io::Write, path::Path, str::FromStr};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use crate::errors::ScriptError;

/// The addresses a successful run produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentRecord {
    /// The controller contract
    pub controller: Address,
    /// The trigger contract
    pub trigger: Address,
    /// The price feed the controller was constructed with
    pub oracle_in_use: Address,
}

/// The on-disk form of a [`DeploymentRecord`]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RecordFile {
    /// The controller's checksummed address
    controller_address: String,
    /// The trigger's checksummed address
    trigger_address: String,
    /// The price feed's checksummed address
    oracle_address_in_use: String,
}

impl DeploymentRecord {
    /// Serialize the record as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ScriptError> {
        let file = RecordFile {
            controller_address: self.controller.to_checksum(None),
            trigger_address: self.trigger.to_checksum(None),
            oracle_address_in_use: self.oracle_in_use.to_checksum(None),
        };
        serde_json::to_string_pretty(&file).map_err(|e| ScriptError::Persistence(e.to_string()))
    }

    /// Parse a record from its JSON form
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let file: RecordFile =
            serde_json::from_str(json).map_err(|e| ScriptError::Persistence(e.to_string()))?;

        let parse = |field: &str, value: &str| {
            Address::from_str(value)
                .map_err(|e| ScriptError::Persistence(format!("invalid {}: {}", field, e)))
        };

        Ok(Self {
            controller: parse("controllerAddress", &file.controller_address)?,
            trigger: parse("triggerAddress", &file.trigger_address)?,
            oracle_in_use: parse("oracleAddressInUse", &file.oracle_address_in_use)?,
        })
    }

    /// Write the record to `path`, replacing any previous record whole.
    ///
    /// The JSON goes to a temporary file in the same directory which is
    /// synced and then renamed over `path`, so readers see either the old
    /// record or the new one.
    pub fn write(&self, path: &Path) -> Result<(), ScriptError> {
        let json = self.to_json()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)
            .map_err(|e| ScriptError::Persistence(format!("creating {}: {}", dir.display(), e)))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| ScriptError::Persistence(format!("creating temp file: {}", e)))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| ScriptError::Persistence(format!("writing temp file: {}", e)))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| ScriptError::Persistence(format!("syncing temp file: {}", e)))?;
        tmp.persist(path).map_err(|e| {
            ScriptError::Persistence(format!("replacing {}: {}", path.display(), e.error))
        })?;

        info!(path = %path.display(), "deployment record written");
        Ok(())
    }

    /// Read a previously written record from `path`
    pub fn read(path: &Path) -> Result<Self, ScriptError> {
        let json = fs::read_to_string(path)
            .map_err(|e| ScriptError::Persistence(format!("reading {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(byte: u8) -> DeploymentRecord {
        DeploymentRecord {
            controller: Address::repeat_byte(byte),
            trigger: Address::repeat_byte(byte + 1),
            oracle_in_use: Address::repeat_byte(byte + 2),
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = record(0x10).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), 3);
        for key in ["controllerAddress", "triggerAddress", "oracleAddressInUse"] {
            assert!(obj[key].as_str().unwrap().starts_with("0x"));
        }
    }

    #[test]
    fn test_write_replaces_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("addresses.json");

        record(0x10).write(&path).unwrap();
        record(0x20).write(&path).unwrap();

        assert_eq!(DeploymentRecord::read(&path).unwrap(), record(0x20));
        // Only the record itself is left behind
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let json = r#"{
            "controllerAddress": "0x1111111111111111111111111111111111111111",
            "triggerAddress": "0x2222222222222222222222222222222222222222",
            "oracleAddressInUse": "0x3333333333333333333333333333333333333333",
            "sentinelAmmAddress": "0x4444444444444444444444444444444444444444"
        }"#;
        assert!(DeploymentRecord::from_json(json).is_err());
    }

    #[test]
    fn test_write_into_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        let path = blocker.join("addresses.json");
        let err = record(0x10).write(&path).unwrap_err();
        assert!(matches!(err, ScriptError::Persistence(_)));
    }
}
