//! The explicit configuration a deployment run is constructed with

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_PATH, DEFAULT_MOCK_ORACLE_ANSWER,
        DEFAULT_NETWORK, NUM_DEPLOY_CONFIRMATIONS, RECEIPT_TIMEOUT_SECS,
    },
    errors::ScriptError,
    networks::NetworkProfile,
};

/// Everything a deployment run reads, gathered before it starts
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// The chain id to deploy to
    pub network: u64,
    /// The deployer's hex-encoded private key
    pub private_key: Option<String>,
    /// An RPC endpoint overriding the profile's default
    pub rpc_url: Option<String>,
    /// Where Hardhat compilation artifacts live
    pub artifacts_dir: PathBuf,
    /// Where the deployment record is written
    pub deployments_path: PathBuf,
    /// Blocks each transaction must be buried under
    pub confirmations: u64,
    /// How long the RPC client waits for a receipt
    pub receipt_timeout: Duration,
    /// The mock price feed's initial answer on ephemeral networks
    pub mock_oracle_answer: i64,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            network: DEFAULT_NETWORK,
            private_key: None,
            rpc_url: None,
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            deployments_path: PathBuf::from(DEFAULT_DEPLOYMENTS_PATH),
            confirmations: NUM_DEPLOY_CONFIRMATIONS,
            receipt_timeout: Duration::from_secs(RECEIPT_TIMEOUT_SECS),
            mock_oracle_answer: DEFAULT_MOCK_ORACLE_ANSWER,
        }
    }
}

impl DeployConfig {
    /// The signing credential, which must be present and non-empty
    pub fn credential(&self) -> Result<&str, ScriptError> {
        match self.private_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ScriptError::Configuration(
                "no deployer private key, set PRIVATE_KEY or pass --priv-key".to_string(),
            )),
        }
    }

    /// The RPC endpoint to use for `profile`
    pub fn rpc_url_for(&self, profile: &NetworkProfile) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| profile.default_rpc_url.to_string())
    }
}

/// Load environment variables from the `.env` file at `path`.
///
/// Returns whether a file was loaded. A missing file is fine; one that exists
/// but does not parse is a configuration error. Variables already set in the
/// environment are not overridden.
pub fn load_env_file(path: &Path) -> Result<bool, ScriptError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(ScriptError::Configuration(format!(
            "error loading {}: {}",
            path.display(),
            e
        ))),
    }
}
