//! Definitions of errors that can occur during a deployment run

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// A missing credential, unknown network, invalid profile, bad artifact,
    /// or an RPC endpoint that does not match the selected network
    Configuration(String),
    /// A contract creation transaction failed to submit, reverted, or never
    /// confirmed
    Deployment(String),
    /// The post-deployment authorization call failed to submit, reverted,
    /// never confirmed, or did not take effect
    Authorization(String),
    /// The deployment record could not be durably written or read back
    Persistence(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Configuration(s) => write!(f, "configuration error: {}", s),
            ScriptError::Deployment(s) => write!(f, "deployment error: {}", s),
            ScriptError::Authorization(s) => write!(f, "authorization error: {}", s),
            ScriptError::Persistence(s) => write!(f, "persistence error: {}", s),
        }
    }
}

impl Error for ScriptError {}

/// The stage of a deployment run, used to attribute a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Credential parsing, client construction, and RPC precondition checks
    Setup,
    /// Looking up the network profile
    ProfileResolution,
    /// Deploying a mock oracle or resolving the production one
    OracleProvisioning,
    /// Deploying the controller contract
    ControllerDeployment,
    /// Deploying the trigger contract
    TriggerDeployment,
    /// Authorizing the trigger on the controller
    Authorization,
    /// Writing the deployment record
    Recording,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Setup => write!(f, "setup"),
            Stage::ProfileResolution => write!(f, "profile resolution"),
            Stage::OracleProvisioning => write!(f, "oracle provisioning"),
            Stage::ControllerDeployment => write!(f, "controller deployment"),
            Stage::TriggerDeployment => write!(f, "trigger deployment"),
            Stage::Authorization => write!(f, "authorization"),
            Stage::Recording => write!(f, "recording"),
        }
    }
}

/// The terminal failure of a deployment run: the stage that was being
/// attempted and the error it surfaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineError {
    /// The stage that failed
    pub stage: Stage,
    /// The underlying cause
    pub source: ScriptError,
}

impl PipelineError {
    /// Attribute `source` to `stage`
    pub fn new(stage: Stage, source: ScriptError) -> Self {
        Self { stage, source }
    }

    /// The error category of the underlying cause
    pub fn kind(&self) -> &ScriptError {
        &self.source
    }
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.source)
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}
