//! Choosing the price feed the controller is constructed with

use alloy::{
    primitives::{Address, I256},
    sol_types::SolConstructor,
};
use tracing::info;

use crate::{
    client::ChainClient,
    constants::{MOCK_ORACLE_ARTIFACT, MOCK_ORACLE_CONTRACT_KEY, MOCK_ORACLE_DECIMALS},
    deployer::{ConstructorArgs, ContractDeployer},
    errors::ScriptError,
    networks::{NetworkKind, NetworkProfile},
    solidity::MockV3Aggregator,
};

/// Where the resolved price feed came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleSource {
    /// A mock deployed during this run
    Mock,
    /// The production feed listed in the network profile
    Production,
}

/// The price feed the controller will read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOracle {
    /// The feed's address
    pub address: Address,
    /// Whether it was deployed or looked up
    pub source: OracleSource,
}

/// The mock feed's constructor arguments
pub fn mock_oracle_constructor_args(initial_answer: i64) -> Result<ConstructorArgs, ScriptError> {
    let answer = I256::try_from(initial_answer)
        .map_err(|e| ScriptError::Configuration(format!("invalid mock oracle answer: {}", e)))?;

    let call = MockV3Aggregator::constructorCall::new((MOCK_ORACLE_DECIMALS, answer));
    Ok(ConstructorArgs {
        count: 2,
        encoded: call.abi_encode(),
    })
}

/// Resolve the price feed for `profile`.
///
/// Ephemeral networks always get a freshly deployed mock, whatever the
/// profile lists. Persistent networks must list a production feed; its
/// absence is a configuration error and nothing is deployed.
pub async fn provision_oracle<C: ChainClient>(
    profile: &NetworkProfile,
    deployer: &mut ContractDeployer<'_, C>,
    mock_answer: i64,
) -> Result<ResolvedOracle, ScriptError> {
    match profile.kind {
        NetworkKind::Ephemeral => {
            if let Some(listed) = profile.price_oracle {
                info!(listed = %listed, "ignoring listed price feed on ephemeral network");
            }

            let args = mock_oracle_constructor_args(mock_answer)?;
            let address = deployer
                .deploy(MOCK_ORACLE_CONTRACT_KEY, MOCK_ORACLE_ARTIFACT, args)
                .await?;

            Ok(ResolvedOracle {
                address,
                source: OracleSource::Mock,
            })
        }
        NetworkKind::Persistent => {
            let address = profile
                .price_oracle
                .filter(|addr| !addr.is_zero())
                .ok_or_else(|| {
                    ScriptError::Configuration(format!(
                        "network {} ({}) lists no price feed",
                        profile.name, profile.chain_id
                    ))
                })?;

            Ok(ResolvedOracle {
                address,
                source: OracleSource::Production,
            })
        }
    }
}
