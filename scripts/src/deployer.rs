//! Sequential contract deployment and constructor argument construction

use std::path::PathBuf;

use alloy::{
    primitives::{aliases::U24, Address, TxHash, U256},
    sol_types::SolConstructor,
};
use tracing::info;

use crate::{
    artifacts::ContractArtifact,
    client::ChainClient,
    errors::ScriptError,
    networks::NetworkProfile,
    solidity::{AutomationTrigger, SentinelAMM},
};

/// The lifecycle of a contract creation transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentStatus {
    /// Submitted, no receipt yet
    Pending,
    /// Included in a block without reverting
    Confirmed,
    /// Reverted, dropped, or never confirmed
    Failed,
}

/// A contract creation submitted during this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    /// The logical name, e.g. `controller`
    pub name: String,
    /// The creation transaction
    pub tx_hash: TxHash,
    /// The resulting address, known once confirmed
    address: Option<Address>,
    /// Where the creation is in its lifecycle
    status: DeploymentStatus,
}

impl DeployedContract {
    /// Record a freshly submitted creation
    fn pending(name: &str, tx_hash: TxHash) -> Self {
        Self {
            name: name.to_string(),
            tx_hash,
            address: None,
            status: DeploymentStatus::Pending,
        }
    }

    /// Settle a pending creation as confirmed at `address`
    fn confirm(&mut self, address: Address) {
        if self.status == DeploymentStatus::Pending {
            self.address = Some(address);
            self.status = DeploymentStatus::Confirmed;
        }
    }

    /// Settle a pending creation as failed
    fn fail(&mut self) {
        if self.status == DeploymentStatus::Pending {
            self.status = DeploymentStatus::Failed;
        }
    }

    /// The deployed address, if the creation confirmed
    pub fn address(&self) -> Option<Address> {
        self.address
    }

    /// The current status
    pub fn status(&self) -> DeploymentStatus {
        self.status
    }
}

/// Constructor arguments for one contract, ABI-encoded
#[derive(Debug, Clone)]
pub struct ConstructorArgs {
    /// The number of arguments encoded
    pub count: usize,
    /// The ABI encoding of the arguments
    pub encoded: Vec<u8>,
}

/// The controller's constructor arguments.
///
/// Tokens are taken in canonical order from the profile, the price feed is
/// the provisioned one, and the deployer becomes the owner.
pub fn controller_constructor_args(
    profile: &NetworkProfile,
    oracle: Address,
    owner: Address,
) -> Result<ConstructorArgs, ScriptError> {
    let (token0, token1) = profile.token_pair()?;
    let fee = U24::try_from(profile.fee_tier).map_err(|e| {
        ScriptError::Configuration(format!("fee tier {} out of range: {}", profile.fee_tier, e))
    })?;

    let call = SentinelAMM::constructorCall::new((
        profile.factory,
        profile.position_manager,
        token0,
        token1,
        fee,
        owner,
        U256::from(profile.range_width_multiplier),
        oracle,
    ));

    Ok(ConstructorArgs {
        count: 8,
        encoded: call.abi_encode(),
    })
}

/// The trigger's constructor arguments: the controller it drives
pub fn trigger_constructor_args(controller: Address) -> ConstructorArgs {
    let call = AutomationTrigger::constructorCall::new((controller,));
    ConstructorArgs {
        count: 1,
        encoded: call.abi_encode(),
    }
}

/// Deploys contracts one at a time, each confirmed before the next is sent
pub struct ContractDeployer<'a, C: ChainClient> {
    /// The signing identity creations are submitted with
    client: &'a C,
    /// Where compilation artifacts are read from
    artifacts_dir: PathBuf,
    /// Every creation submitted so far, in order
    deployed: Vec<DeployedContract>,
}

impl<'a, C: ChainClient> ContractDeployer<'a, C> {
    /// Create a deployer submitting through `client`
    pub fn new(client: &'a C, artifacts_dir: PathBuf) -> Self {
        Self {
            client,
            artifacts_dir,
            deployed: Vec::new(),
        }
    }

    /// The client creations are submitted through
    pub fn client(&self) -> &'a C {
        self.client
    }

    /// The address constructor arguments should name as owner
    pub fn deployer_address(&self) -> Address {
        self.client.signer_address()
    }

    /// Every creation submitted so far, in submission order
    pub fn deployed(&self) -> &[DeployedContract] {
        &self.deployed
    }

    /// Load `artifact_name`, deploy it with `args`, and wait for the receipt.
    ///
    /// Returns the confirmed address; any revert, drop, or RPC failure is a
    /// [`ScriptError::Deployment`].
    pub async fn deploy(
        &mut self,
        name: &str,
        artifact_name: &str,
        args: ConstructorArgs,
    ) -> Result<Address, ScriptError> {
        let artifact = ContractArtifact::load(&self.artifacts_dir, artifact_name)?;
        let init_code = artifact.init_code(args.count, &args.encoded)?;

        info!(contract = name, artifact = artifact_name, "deploying");
        let tx_hash = self
            .client
            .submit_creation(init_code)
            .await
            .map_err(|e| ScriptError::Deployment(format!("submitting {}: {}", name, e)))?;

        self.deployed.push(DeployedContract::pending(name, tx_hash));
        let idx = self.deployed.len() - 1;

        let res = self.client.await_confirmation(tx_hash).await;
        let contract = &mut self.deployed[idx];
        let confirmation = match res {
            Ok(confirmation) => confirmation,
            Err(e) => {
                contract.fail();
                return Err(ScriptError::Deployment(format!(
                    "{} creation {} did not confirm: {}",
                    name, tx_hash, e
                )));
            }
        };

        if !confirmation.success {
            contract.fail();
            return Err(ScriptError::Deployment(format!(
                "{} creation {} reverted",
                name, tx_hash
            )));
        }

        let Some(address) = confirmation.contract_address else {
            contract.fail();
            return Err(ScriptError::Deployment(format!(
                "receipt for {} creation {} has no contract address",
                name, tx_hash
            )));
        };

        contract.confirm(address);
        info!(
            contract = name,
            address = %address,
            tx_hash = %tx_hash,
            block = ?confirmation.block_number,
            "deployed"
        );
        Ok(address)
    }
}
