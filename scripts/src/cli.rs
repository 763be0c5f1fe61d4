//! Definitions of CLI arguments and commands for the deploy script

use std::{error::Error, path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy, list_networks, show_record},
    config::DeployConfig,
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_PATH, DEFAULT_MOCK_ORACLE_ANSWER,
        DEFAULT_NETWORK, NUM_DEPLOY_CONFIRMATIONS, RECEIPT_TIMEOUT_SECS,
    },
};

/// Deploy the Sentinel controller and its automation trigger
#[derive(Parser)]
#[command(version)]
pub struct Cli {
    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The script's commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the price feed (where needed), controller, and trigger, then
    /// authorize the trigger and record the addresses
    Deploy(DeployArgs),
    /// List the networks that can be deployed to
    Networks,
    /// Print a previously written deployment record
    Show(ShowArgs),
}

impl Command {
    /// Run the command to completion
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        match self {
            Command::Deploy(args) => {
                deploy(args.into()).await?;
            }
            Command::Networks => list_networks(),
            Command::Show(args) => {
                show_record(&args.deployments_path)?;
            }
        }
        Ok(())
    }
}

/// Arguments for a deployment run
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Private key of the deployer
    #[arg(short, long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub priv_key: Option<String>,

    /// Network RPC URL, defaults to the network's public endpoint
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Chain id of the network to deploy to
    #[arg(short, long, env = "NETWORK", default_value_t = DEFAULT_NETWORK)]
    pub network: u64,

    /// Directory holding the compiled Hardhat artifacts
    #[arg(long, env = "ARTIFACTS_DIR", default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Path of the deployment record
    #[arg(short, long, env = "DEPLOYMENTS_PATH", default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// Blocks each transaction must be buried under before the next is sent
    #[arg(long, default_value_t = NUM_DEPLOY_CONFIRMATIONS)]
    pub confirmations: u64,

    /// Seconds to wait for each receipt
    #[arg(long, default_value_t = RECEIPT_TIMEOUT_SECS)]
    pub receipt_timeout: u64,

    /// Initial answer of the mock price feed on local networks, with 8
    /// decimals
    #[arg(long, default_value_t = DEFAULT_MOCK_ORACLE_ANSWER, allow_negative_numbers = true)]
    pub mock_oracle_answer: i64,
}

impl From<DeployArgs> for DeployConfig {
    fn from(args: DeployArgs) -> Self {
        DeployConfig {
            network: args.network,
            private_key: args.priv_key,
            rpc_url: args.rpc_url,
            artifacts_dir: args.artifacts_dir,
            deployments_path: args.deployments_path,
            confirmations: args.confirmations,
            receipt_timeout: Duration::from_secs(args.receipt_timeout),
            mock_oracle_answer: args.mock_oracle_answer,
        }
    }
}

/// Arguments for printing a deployment record
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Path of the deployment record
    #[arg(short, long, env = "DEPLOYMENTS_PATH", default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,
}
