//! The static table of deployable networks and the lookup over it
//!
//! Adding a network means adding an entry to [`NETWORK_PROFILES`]. A chain id
//! that is not in the table is rejected; there is no default profile.

use std::fmt::{self, Display};

use alloy::primitives::{address, Address};

use crate::{constants::VALID_FEE_TIERS, errors::ScriptError};

/// Whether a network's state outlives the deployment run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkKind {
    /// A local test node or fork with no real oracle infrastructure
    Ephemeral,
    /// A public network with production dependencies
    Persistent,
}

impl Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkKind::Ephemeral => write!(f, "ephemeral"),
            NetworkKind::Persistent => write!(f, "persistent"),
        }
    }
}

/// The on-chain dependencies and economic parameters of one network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    /// The numeric chain id
    pub chain_id: u64,
    /// A human-readable name
    pub name: &'static str,
    /// Whether the network is ephemeral or persistent
    pub kind: NetworkKind,
    /// The RPC endpoint used when none is configured
    pub default_rpc_url: &'static str,
    /// The Uniswap v3 factory
    pub factory: Address,
    /// The Uniswap v3 nonfungible position manager
    pub position_manager: Address,
    /// The base token of the pool, in configuration order
    pub base_token: Address,
    /// The quote token of the pool, in configuration order
    pub quote_token: Address,
    /// The production price feed, if the network has one
    pub price_oracle: Option<Address>,
    /// The pool fee tier, in hundredths of a basis point
    pub fee_tier: u32,
    /// The initial range-width multiplier of the controller
    pub range_width_multiplier: u64,
}

/// The networks this tool can deploy to
pub static NETWORK_PROFILES: &[NetworkProfile] = &[
    NetworkProfile {
        chain_id: 1,
        name: "mainnet",
        kind: NetworkKind::Persistent,
        default_rpc_url: "https://rpc.ankr.com/eth",
        factory: address!("1F98431c8aD98523631AE4a59f267346ea31F984"),
        position_manager: address!("C36442b4a4522E871399CD717aBDD847Ab11FE88"),
        base_token: address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
        quote_token: address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
        price_oracle: Some(address!("5f4eC3Df9cbd43714FE274045F36413C88f58e50")),
        fee_tier: 500,
        range_width_multiplier: 100,
    },
    NetworkProfile {
        chain_id: 11155111,
        name: "sepolia",
        kind: NetworkKind::Persistent,
        default_rpc_url: "https://ethereum-sepolia-rpc.publicnode.com",
        factory: address!("0227628f3F023bb0B980b67D528571c95c6DaC1c"),
        position_manager: address!("1238536071E1c677A632429e3655c799b22cDA52"),
        base_token: address!("fFf9976782d46CC05630D1f6eBAb18b2324d6B14"),
        quote_token: address!("1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"),
        price_oracle: Some(address!("694AA1769357215DE4FAC081bf1f309aDC325306")),
        fee_tier: 500,
        range_width_multiplier: 100,
    },
    // A Hardhat / Anvil fork of mainnet. The mainnet feed is listed but a mock
    // is always deployed in its place.
    NetworkProfile {
        chain_id: 31337,
        name: "hardhat",
        kind: NetworkKind::Ephemeral,
        default_rpc_url: "http://127.0.0.1:8545",
        factory: address!("1F98431c8aD98523631AE4a59f267346ea31F984"),
        position_manager: address!("C36442b4a4522E871399CD717aBDD847Ab11FE88"),
        base_token: address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
        quote_token: address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
        price_oracle: Some(address!("5f4eC3Df9cbd43714FE274045F36413C88f58e50")),
        fee_tier: 500,
        range_width_multiplier: 100,
    },
];

impl NetworkProfile {
    /// Whether a mock price feed must be deployed on this network
    pub fn is_ephemeral(&self) -> bool {
        self.kind == NetworkKind::Ephemeral
    }

    /// The pool's tokens in canonical ascending order
    pub fn token_pair(&self) -> Result<(Address, Address), ScriptError> {
        canonical_token_pair(self.base_token, self.quote_token)
    }

    /// Check that every field the contract deployer consumes is usable
    pub fn validate(&self) -> Result<(), ScriptError> {
        let required = [
            ("factory", self.factory),
            ("position manager", self.position_manager),
            ("base token", self.base_token),
            ("quote token", self.quote_token),
        ];
        for (field, addr) in required {
            if addr.is_zero() {
                return Err(ScriptError::Configuration(format!(
                    "network {} ({}) has no {} address",
                    self.name, self.chain_id, field
                )));
            }
        }

        self.token_pair()?;

        if !VALID_FEE_TIERS.contains(&self.fee_tier) {
            return Err(ScriptError::Configuration(format!(
                "network {} ({}) has invalid fee tier {}, expected one of {:?}",
                self.name, self.chain_id, self.fee_tier, VALID_FEE_TIERS
            )));
        }

        if self.range_width_multiplier == 0 {
            return Err(ScriptError::Configuration(format!(
                "network {} ({}) has a zero range width multiplier",
                self.name, self.chain_id
            )));
        }

        Ok(())
    }
}

/// Resolve a chain id against the built-in profile table
pub fn resolve_profile(chain_id: u64) -> Result<NetworkProfile, ScriptError> {
    resolve_profile_in(NETWORK_PROFILES, chain_id)
}

/// Resolve a chain id against `profiles`, validating the match
pub fn resolve_profile_in(
    profiles: &[NetworkProfile],
    chain_id: u64,
) -> Result<NetworkProfile, ScriptError> {
    let profile = profiles
        .iter()
        .find(|p| p.chain_id == chain_id)
        .ok_or_else(|| ScriptError::Configuration(format!("unknown network {}", chain_id)))?;

    profile.validate()?;
    Ok(profile.clone())
}

/// Order two distinct token addresses ascending by raw value, as Uniswap v3
/// pools require
pub fn canonical_token_pair(a: Address, b: Address) -> Result<(Address, Address), ScriptError> {
    if a == b {
        return Err(ScriptError::Configuration(format!(
            "pool tokens must differ, got {} twice",
            a
        )));
    }

    Ok(if a < b { (a, b) } else { (b, a) })
}
