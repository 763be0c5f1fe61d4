//! Sequences a deployment run end to end.
//!
//! A run moves through the stages of [`Stage`] in order, each one starting
//! only after the previous one confirmed. The first failure stops the run and
//! is reported with the stage it happened in. Contracts confirmed before the
//! failure stay on chain and are logged, but the deployment record is only
//! written once every stage up to authorization has succeeded.

use alloy::primitives::{utils::format_ether, Address};
use tracing::{info, warn};

use crate::{
    authorization::authorize_trigger,
    client::{setup_client, ChainClient, RpcClient},
    config::DeployConfig,
    constants::{
        CONTROLLER_ARTIFACT, CONTROLLER_CONTRACT_KEY, TRIGGER_ARTIFACT, TRIGGER_CONTRACT_KEY,
    },
    deployer::{
        controller_constructor_args, trigger_constructor_args, ContractDeployer, DeployedContract,
        DeploymentStatus,
    },
    errors::{PipelineError, ScriptError, Stage},
    networks::{resolve_profile, resolve_profile_in, NetworkProfile, NETWORK_PROFILES},
    oracle::{provision_oracle, ResolvedOracle},
    record::DeploymentRecord,
};

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing has happened yet
    Start,
    /// The network profile was found and validated
    ProfileResolved,
    /// The RPC endpoint answered for the profile's chain
    Connected,
    /// The price feed is known
    OracleResolved,
    /// The controller is on chain
    ControllerDeployed,
    /// The trigger is on chain
    TriggerDeployed,
    /// The controller accepts calls from the trigger
    Authorized,
    /// The deployment record is on disk
    Recorded,
}

/// Everything a successful run produced
#[derive(Debug, Clone)]
pub struct DeploymentOutcome {
    /// The record written to disk
    pub record: DeploymentRecord,
    /// The profile the run deployed against
    pub profile: NetworkProfile,
    /// The price feed the controller reads
    pub oracle: ResolvedOracle,
    /// Every contract created, in creation order
    pub contracts: Vec<DeployedContract>,
}

/// Runs the deployment pipeline against one chain
pub struct Orchestrator<C: ChainClient> {
    /// The run's configuration
    config: DeployConfig,
    /// The signing identity, owned for the whole run
    client: C,
    /// The profiles the configured network is resolved against
    profiles: Vec<NetworkProfile>,
}

impl Orchestrator<RpcClient> {
    /// Build an orchestrator signing over JSON-RPC.
    ///
    /// Fails before any network traffic if the credential is missing or
    /// malformed.
    pub fn connect(config: DeployConfig) -> Result<Self, PipelineError> {
        let setup_err = |e| PipelineError::new(Stage::Setup, e);

        let priv_key = config.credential().map_err(setup_err)?;
        let profile = resolve_profile(config.network)
            .map_err(|e| PipelineError::new(Stage::ProfileResolution, e))?;
        let rpc_url = config.rpc_url_for(&profile);

        let client = setup_client(
            priv_key,
            &rpc_url,
            config.confirmations,
            config.receipt_timeout,
        )
        .map_err(setup_err)?;
        info!(rpc_url = %rpc_url, network = profile.name, "connected");

        Ok(Self::new(config, client))
    }
}

impl<C: ChainClient> Orchestrator<C> {
    /// Build an orchestrator over an existing client
    pub fn new(config: DeployConfig, client: C) -> Self {
        Self {
            config,
            client,
            profiles: NETWORK_PROFILES.to_vec(),
        }
    }

    /// Resolve networks against `profiles` instead of the built-in table
    pub fn with_profiles(mut self, profiles: Vec<NetworkProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    /// The client the run signs with
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Execute the run once, from profile resolution to deployment record
    pub async fn run(&self) -> Result<DeploymentOutcome, PipelineError> {
        let mut deployer = ContractDeployer::new(&self.client, self.config.artifacts_dir.clone());
        let mut state = RunState::Start;

        let res = self.execute(&mut deployer, &mut state).await;
        if let Err(e) = &res {
            warn!(reached = ?state, error = %e, "deployment failed");
            log_orphans(deployer.deployed());
        }
        res
    }

    /// Drive `state` forward one stage at a time
    async fn execute(
        &self,
        deployer: &mut ContractDeployer<'_, C>,
        state: &mut RunState,
    ) -> Result<DeploymentOutcome, PipelineError> {
        let stage_err = |stage: Stage| move |e: ScriptError| PipelineError::new(stage, e);

        let profile = resolve_profile_in(&self.profiles, self.config.network)
            .map_err(stage_err(Stage::ProfileResolution))?;
        info!(
            network = profile.name,
            chain_id = profile.chain_id,
            kind = %profile.kind,
            "resolved network"
        );
        advance(state, RunState::ProfileResolved);

        self.check_connection(&profile)
            .await
            .map_err(stage_err(Stage::Setup))?;
        advance(state, RunState::Connected);

        let oracle = provision_oracle(&profile, deployer, self.config.mock_oracle_answer)
            .await
            .map_err(stage_err(Stage::OracleProvisioning))?;
        info!(oracle = %oracle.address, source = ?oracle.source, "price feed resolved");
        advance(state, RunState::OracleResolved);

        let controller = self
            .deploy_controller(deployer, &profile, oracle.address)
            .await
            .map_err(stage_err(Stage::ControllerDeployment))?;
        advance(state, RunState::ControllerDeployed);

        let trigger = deployer
            .deploy(
                TRIGGER_CONTRACT_KEY,
                TRIGGER_ARTIFACT,
                trigger_constructor_args(controller),
            )
            .await
            .map_err(stage_err(Stage::TriggerDeployment))?;
        advance(state, RunState::TriggerDeployed);

        authorize_trigger(deployer.client(), controller, trigger)
            .await
            .map_err(stage_err(Stage::Authorization))?;
        advance(state, RunState::Authorized);

        let record = DeploymentRecord {
            controller,
            trigger,
            oracle_in_use: oracle.address,
        };
        record
            .write(&self.config.deployments_path)
            .map_err(stage_err(Stage::Recording))?;
        advance(state, RunState::Recorded);

        Ok(DeploymentOutcome {
            record,
            profile,
            oracle,
            contracts: deployer.deployed().to_vec(),
        })
    }

    /// Check the endpoint serves the profile's chain and log the signer
    async fn check_connection(&self, profile: &NetworkProfile) -> Result<(), ScriptError> {
        let chain_id = self
            .client
            .chain_id()
            .await
            .map_err(|e| ScriptError::Configuration(format!("querying chain id: {}", e)))?;
        if chain_id != profile.chain_id {
            return Err(ScriptError::Configuration(format!(
                "RPC endpoint serves chain {}, expected {} ({})",
                chain_id, profile.chain_id, profile.name
            )));
        }

        let signer = self.client.signer_address();
        match self.client.signer_balance().await {
            Ok(balance) if balance.is_zero() => {
                warn!(signer = %signer, "deployer has no balance, transactions will likely fail")
            }
            Ok(balance) => info!(signer = %signer, balance = %format_ether(balance), "deployer"),
            Err(e) => warn!(signer = %signer, error = %e, "could not query deployer balance"),
        }

        Ok(())
    }

    /// Deploy the controller, owned by the deployer
    async fn deploy_controller(
        &self,
        deployer: &mut ContractDeployer<'_, C>,
        profile: &NetworkProfile,
        oracle: Address,
    ) -> Result<Address, ScriptError> {
        let owner = deployer.deployer_address();
        let args = controller_constructor_args(profile, oracle, owner)?;
        deployer
            .deploy(CONTROLLER_CONTRACT_KEY, CONTROLLER_ARTIFACT, args)
            .await
    }
}

/// Move to `next`, logging the transition
fn advance(state: &mut RunState, next: RunState) {
    info!(from = ?*state, to = ?next, "stage complete");
    *state = next;
}

/// Log contracts left on chain by a failed run
fn log_orphans(deployed: &[DeployedContract]) {
    let orphans = deployed
        .iter()
        .filter(|c| c.status() == DeploymentStatus::Confirmed)
        .filter_map(|c| c.address().map(|addr| (c, addr)));

    for (contract, address) in orphans {
        warn!(
            contract = %contract.name,
            address = %address,
            tx_hash = %contract.tx_hash,
            "contract deployed by failed run, not recorded"
        );
    }
}
