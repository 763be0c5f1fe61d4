//! Checks on the inputs a deployment run is built from, through the public API

use std::fs;

use alloy::primitives::{address, Address};
use sentinel_scripts::{
    artifacts::ContractArtifact,
    constants::{CONTROLLER_ARTIFACT, DEFAULT_NETWORK},
    deployer::controller_constructor_args,
    errors::ScriptError,
    networks::{resolve_profile, NETWORK_PROFILES},
    record::DeploymentRecord,
};
use serde_json::json;

#[test]
fn default_network_is_local_and_ephemeral() {
    let profile = resolve_profile(DEFAULT_NETWORK).unwrap();
    assert!(profile.is_ephemeral());
    assert!(profile.default_rpc_url.starts_with("http://127.0.0.1"));
}

#[test]
fn every_profile_yields_controller_arguments() {
    let oracle = Address::repeat_byte(0x0f);
    let owner = Address::repeat_byte(0x0e);

    for profile in NETWORK_PROFILES {
        let args = controller_constructor_args(profile, oracle, owner).unwrap();
        assert_eq!(args.count, 8);
        assert_eq!(args.encoded.len(), 8 * 32);
    }
}

#[test]
fn controller_artifact_loads_from_nested_directory() {
    let dir = tempfile::tempdir().unwrap();
    let contract_dir = dir.path().join("contracts").join("SentinelAMM.sol");
    fs::create_dir_all(&contract_dir).unwrap();

    let inputs: Vec<_> = (0..8)
        .map(|_| json!({ "name": "", "type": "address" }))
        .collect();
    let artifact = json!({
        "contractName": CONTROLLER_ARTIFACT,
        "abi": [{ "type": "constructor", "inputs": inputs, "stateMutability": "nonpayable" }],
        "bytecode": "0x60806040",
        "linkReferences": {}
    });
    let path = contract_dir.join("SentinelAMM.json");
    fs::write(path, artifact.to_string()).unwrap();

    let loaded = ContractArtifact::load(dir.path(), CONTROLLER_ARTIFACT)
        .unwrap();
    assert_eq!(loaded.constructor_arity(), 8);

    let profile = resolve_profile(1).unwrap();
    let oracle = Address::repeat_byte(1);
    let owner = Address::repeat_byte(2);
    let args = controller_constructor_args(&profile, oracle, owner).unwrap();
    let init_code = loaded.init_code(args.count, &args.encoded).unwrap();
    assert_eq!(init_code.len(), 4 + 8 * 32);
}

#[test]
fn missing_artifact_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ContractArtifact::load(dir.path(), CONTROLLER_ARTIFACT)
        .unwrap_err();
    assert!(matches!(err, ScriptError::Configuration(_)));
}

#[test]
fn record_is_written_checksummed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sentinel_addresses.json");
    let record = DeploymentRecord {
        controller: address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
        trigger: address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512"),
        oracle_in_use: address!("9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0"),
    };
    record.write(&path).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"controllerAddress\": \"0x5FbDB2315678afecb367f032d93F642f64180aa3\""));
    assert!(raw.contains("\"triggerAddress\": \"0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512\""));
    assert!(raw.contains("\"oracleAddressInUse\": \"0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0\""));
    assert_eq!(DeploymentRecord::read(&path).unwrap(), record);
}
