//! Loading of Hardhat compilation artifacts

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::{json_abi::JsonAbi, primitives::Bytes};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::ScriptError;

/// The subset of a Hardhat artifact needed to deploy a contract
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    /// The contract name
    contract_name: String,
    /// The contract ABI
    abi: JsonAbi,
    /// The creation bytecode, in hex
    bytecode: String,
    /// Library placeholders that must be linked before deployment
    #[serde(default)]
    link_references: Value,
}

/// A compiled contract ready to be deployed
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    /// The contract name
    pub name: String,
    /// The contract ABI
    pub abi: JsonAbi,
    /// The creation bytecode
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Parse a Hardhat artifact from its JSON text
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let artifact: HardhatArtifact = serde_json::from_str(json)
            .map_err(|e| ScriptError::Configuration(format!("error parsing artifact: {}", e)))?;

        let has_links = match &artifact.link_references {
            Value::Object(map) => !map.is_empty(),
            Value::Null => false,
            _ => true,
        };
        if has_links {
            return Err(ScriptError::Configuration(format!(
                "artifact {} references unlinked libraries",
                artifact.contract_name
            )));
        }

        let bytecode = Bytes::from_str(&artifact.bytecode).map_err(|e| {
            ScriptError::Configuration(format!(
                "invalid bytecode in artifact {}: {}",
                artifact.contract_name, e
            ))
        })?;
        if bytecode.is_empty() {
            return Err(ScriptError::Configuration(format!(
                "artifact {} has no creation bytecode, is it an interface?",
                artifact.contract_name
            )));
        }

        Ok(Self {
            name: artifact.contract_name,
            abi: artifact.abi,
            bytecode,
        })
    }

    /// Find and parse the artifact for `contract_name` below `artifacts_dir`
    pub fn load(artifacts_dir: &Path, contract_name: &str) -> Result<Self, ScriptError> {
        let mut paths = find_artifacts(artifacts_dir, contract_name)?;
        if paths.len() > 1 {
            let listed: Vec<_> = paths.iter().map(|p| p.display().to_string()).collect();
            return Err(ScriptError::Configuration(format!(
                "artifact name {} is ambiguous, found {}",
                contract_name,
                listed.join(", ")
            )));
        }

        let path = paths.pop().ok_or_else(|| {
            ScriptError::Configuration(format!(
                "no artifact for {} under {}, have the contracts been compiled?",
                contract_name,
                artifacts_dir.display()
            ))
        })?;

        let json = fs::read_to_string(&path).map_err(|e| {
            ScriptError::Configuration(format!("error reading {}: {}", path.display(), e))
        })?;

        Self::from_json(&json)
    }

    /// The number of inputs the artifact's constructor takes
    pub fn constructor_arity(&self) -> usize {
        self.abi
            .constructor
            .as_ref()
            .map(|c| c.inputs.len())
            .unwrap_or(0)
    }

    /// Build the init code for a creation transaction, checking that the
    /// encoded arguments match the artifact's constructor
    pub fn init_code(&self, num_args: usize, encoded_args: &[u8]) -> Result<Bytes, ScriptError> {
        let arity = self.constructor_arity();
        if arity != num_args {
            return Err(ScriptError::Configuration(format!(
                "artifact {} constructor takes {} arguments, expected {}",
                self.name, arity, num_args
            )));
        }

        Ok([self.bytecode.as_ref(), encoded_args].concat().into())
    }
}

/// Every `<contract_name>.json` below `dir`, in sorted path order. Hardhat's
/// `.dbg.json` companions never match since the name must be exact.
fn find_artifacts(dir: &Path, contract_name: &str) -> Result<Vec<PathBuf>, ScriptError> {
    let target = format!("{}.json", contract_name);
    let mut found = Vec::new();
    collect_artifacts(dir, &target, &mut found)?;

    found.sort();
    Ok(found)
}

/// Walk `dir` recursively, pushing files named `target` onto `found`
fn collect_artifacts(
    dir: &Path,
    target: &str,
    found: &mut Vec<PathBuf>,
) -> Result<(), ScriptError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ScriptError::Configuration(format!("error reading {}: {}", dir.display(), e))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ScriptError::Configuration(e.to_string()))?;
        let path = entry.path();
        if path.is_dir() {
            collect_artifacts(&path, target, found)?;
        } else if entry.file_name().to_string_lossy() == target {
            found.push(path);
        }
    }

    Ok(())
}
