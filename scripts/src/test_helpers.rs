//! An in-memory chain and artifact fixtures for unit tests

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
    sync::Mutex,
};

use alloy::{
    primitives::{address, keccak256, Address, Bytes, TxHash, U256},
    sol_types::{SolCall, SolValue},
};
use serde_json::json;

use crate::{
    client::{ChainClient, ClientError, Confirmation},
    config::DeployConfig,
    constants::{CONTROLLER_ARTIFACT, MOCK_ORACLE_ARTIFACT, TRIGGER_ARTIFACT},
    solidity::SentinelAMM::{automationTriggerCall, setAutomationTriggerCall},
};

/// The first default Anvil / Hardhat account
pub const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// The address of [`TEST_PRIVATE_KEY`]
pub const TEST_ADDRESS: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// A transaction awaiting its receipt
enum PendingTx {
    Creation { address: Address, revert: bool, dropped: bool },
    Call { to: Address, calldata: Bytes, revert: bool, dropped: bool },
}

#[derive(Default)]
struct MockState {
    nonce: u64,
    block: u64,
    creations_submitted: usize,
    pending: HashMap<TxHash, PendingTx>,
    deployed: Vec<Address>,
    triggers: HashMap<Address, Address>,
}

/// A chain that confirms everything instantly unless told otherwise
pub struct MockChain {
    chain_id: u64,
    signer: Address,
    revert_creations: HashSet<usize>,
    drop_creations: HashSet<usize>,
    revert_calls: bool,
    drop_calls: bool,
    state: Mutex<MockState>,
}

impl MockChain {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            signer: TEST_ADDRESS,
            revert_creations: HashSet::new(),
            drop_creations: HashSet::new(),
            revert_calls: false,
            drop_calls: false,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Sign with a different identity, changing every CREATE address
    pub fn with_signer(mut self, signer: Address) -> Self {
        self.signer = signer;
        self
    }

    /// Revert the `n`th contract creation (0-indexed)
    pub fn revert_creation(mut self, n: usize) -> Self {
        self.revert_creations.insert(n);
        self
    }

    /// Never confirm the `n`th contract creation (0-indexed)
    pub fn drop_creation(mut self, n: usize) -> Self {
        self.drop_creations.insert(n);
        self
    }

    /// Revert every state-mutating call
    pub fn revert_calls(mut self) -> Self {
        self.revert_calls = true;
        self
    }

    /// Never confirm any state-mutating call
    pub fn drop_calls(mut self) -> Self {
        self.drop_calls = true;
        self
    }

    /// Addresses of successfully deployed contracts, in order
    pub fn creations(&self) -> Vec<Address> {
        self.state.lock().unwrap().deployed.clone()
    }

    fn next_tx_hash(state: &mut MockState) -> (u64, TxHash) {
        let nonce = state.nonce;
        state.nonce += 1;
        (nonce, keccak256(nonce.to_be_bytes()))
    }
}

impl ChainClient for MockChain {
    fn signer_address(&self) -> Address {
        self.signer
    }

    async fn chain_id(&self) -> Result<u64, ClientError> {
        Ok(self.chain_id)
    }

    async fn signer_balance(&self) -> Result<U256, ClientError> {
        Ok(U256::from(10_000u64) * U256::from(10u64).pow(U256::from(18u64)))
    }

    async fn submit_creation(&self, init_code: Bytes) -> Result<TxHash, ClientError> {
        if init_code.is_empty() {
            return Err(ClientError("empty init code".to_string()));
        }

        let mut state = self.state.lock().unwrap();
        let (nonce, tx_hash) = Self::next_tx_hash(&mut state);
        let idx = state.creations_submitted;
        state.creations_submitted += 1;

        state.pending.insert(
            tx_hash,
            PendingTx::Creation {
                address: self.signer.create(nonce),
                revert: self.revert_creations.contains(&idx),
                dropped: self.drop_creations.contains(&idx),
            },
        );
        Ok(tx_hash)
    }

    async fn submit_call(&self, to: Address, calldata: Bytes) -> Result<TxHash, ClientError> {
        let mut state = self.state.lock().unwrap();
        let (_, tx_hash) = Self::next_tx_hash(&mut state);
        state.pending.insert(
            tx_hash,
            PendingTx::Call {
                to,
                calldata,
                revert: self.revert_calls,
                dropped: self.drop_calls,
            },
        );
        Ok(tx_hash)
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<Confirmation, ClientError> {
        let mut state = self.state.lock().unwrap();
        let tx = state
            .pending
            .remove(&tx_hash)
            .ok_or_else(|| ClientError(format!("unknown transaction {}", tx_hash)))?;

        let (revert, dropped) = match &tx {
            PendingTx::Creation { revert, dropped, .. } => (*revert, *dropped),
            PendingTx::Call { revert, dropped, .. } => (*revert, *dropped),
        };
        if dropped {
            return Err(ClientError(format!("transaction {} dropped", tx_hash)));
        }

        state.block += 1;
        let block_number = Some(state.block);
        if revert {
            return Ok(Confirmation {
                success: false,
                contract_address: None,
                block_number,
            });
        }

        let contract_address = match tx {
            PendingTx::Creation { address, .. } => {
                state.deployed.push(address);
                Some(address)
            }
            PendingTx::Call { to, calldata, .. } => {
                if let Ok(call) = setAutomationTriggerCall::abi_decode(&calldata) {
                    state.triggers.insert(to, call.trigger);
                }
                None
            }
        };

        Ok(Confirmation {
            success: true,
            contract_address,
            block_number,
        })
    }

    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, ClientError> {
        if !calldata.starts_with(&automationTriggerCall::SELECTOR) {
            return Err(ClientError("execution reverted".to_string()));
        }

        let state = self.state.lock().unwrap();
        let trigger = state.triggers.get(&to).copied().unwrap_or_default();
        Ok(trigger.abi_encode().into())
    }
}

/// A minimal Hardhat artifact whose constructor takes `arity` arguments
pub fn artifact_json(name: &str, arity: usize) -> String {
    let inputs: Vec<_> = (0..arity)
        .map(|i| json!({ "name": format!("arg{}", i), "type": "uint256", "internalType": "uint256" }))
        .collect();
    let abi = if arity == 0 {
        json!([])
    } else {
        json!([{ "type": "constructor", "inputs": inputs, "stateMutability": "nonpayable" }])
    };

    json!({
        "_format": "hh-sol-artifact-1",
        "contractName": name,
        "sourceName": format!("contracts/{}.sol", name),
        "abi": abi,
        "bytecode": "0x6080604052348015600f57600080fd5b50",
        "deployedBytecode": "0x6080604052",
        "linkReferences": {},
        "deployedLinkReferences": {}
    })
    .to_string()
}

/// Write artifacts for the three contracts a run deploys below `dir`
pub fn write_fixture_artifacts(dir: &Path) {
    let fixtures = [
        (CONTROLLER_ARTIFACT, 8),
        (TRIGGER_ARTIFACT, 1),
        (MOCK_ORACLE_ARTIFACT, 2),
    ];
    for (name, arity) in fixtures {
        let contract_dir = dir.join("contracts").join(format!("{}.sol", name));
        fs::create_dir_all(&contract_dir).unwrap();

        let path = contract_dir.join(format!("{}.json", name));
        fs::write(path, artifact_json(name, arity)).unwrap();
    }
}

/// A config deploying to `network` with artifacts and record under `dir`
pub fn test_config(dir: &Path, network: u64) -> DeployConfig {
    write_fixture_artifacts(&dir.join("artifacts"));
    DeployConfig {
        network,
        private_key: Some(TEST_PRIVATE_KEY.to_string()),
        artifacts_dir: dir.join("artifacts"),
        deployments_path: dir.join("sentinel_addresses.json"),
        ..Default::default()
    }
}
