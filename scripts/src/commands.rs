//! Implementations of the script's commands

use std::path::Path;

use crate::{
    config::DeployConfig,
    errors::{PipelineError, ScriptError},
    networks::NETWORK_PROFILES,
    orchestrator::{DeploymentOutcome, Orchestrator},
    record::DeploymentRecord,
};

/// Run the full deployment pipeline and print what it produced
pub async fn deploy(config: DeployConfig) -> Result<DeploymentOutcome, PipelineError> {
    let orchestrator = Orchestrator::connect(config)?;
    let outcome = orchestrator.run().await?;

    println!(
        "network:    {} ({})",
        outcome.profile.name, outcome.profile.chain_id
    );
    println!("controller: {}", outcome.record.controller);
    println!("trigger:    {}", outcome.record.trigger);
    println!(
        "oracle:     {} ({:?})",
        outcome.record.oracle_in_use, outcome.oracle.source
    );
    Ok(outcome)
}

/// Print the built-in network table
pub fn list_networks() {
    println!("{:<10} {:<10} {:<11} rpc", "chain id", "name", "kind");
    for profile in NETWORK_PROFILES {
        println!(
            "{:<10} {:<10} {:<11} {}",
            profile.chain_id,
            profile.name,
            profile.kind.to_string(),
            profile.default_rpc_url
        );
    }
}

/// Print the record at `path`
pub fn show_record(path: &Path) -> Result<DeploymentRecord, ScriptError> {
    let record = DeploymentRecord::read(path)?;
    println!("{}", record.to_json()?);
    Ok(record)
}
