//! Constants used in the deploy scripts

/// The name of the controller's compilation artifact
pub const CONTROLLER_ARTIFACT: &str = "SentinelAMM";

/// The name of the trigger's compilation artifact
pub const TRIGGER_ARTIFACT: &str = "AutomationTrigger";

/// The name of the mock price feed's compilation artifact
pub const MOCK_ORACLE_ARTIFACT: &str = "MockV3Aggregator";

/// The logical name of the controller in logs and the deployment record
pub const CONTROLLER_CONTRACT_KEY: &str = "controller";

/// The logical name of the trigger in logs and the deployment record
pub const TRIGGER_CONTRACT_KEY: &str = "trigger";

/// The logical name of the mock price feed in logs
pub const MOCK_ORACLE_CONTRACT_KEY: &str = "mock-oracle";

/// The default directory holding Hardhat compilation artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The default path of the deployment record, relative to the project root
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "sentinel_addresses.json";

/// The default chain to deploy to, a local Hardhat / Anvil node
pub const DEFAULT_NETWORK: u64 = 31337;

/// The number of confirmations to wait for each transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// How long to wait for a transaction receipt before giving up, in seconds
pub const RECEIPT_TIMEOUT_SECS: u64 = 120;

/// How often to poll for a receipt or a new block, in milliseconds
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 100;

/// The number of decimals reported by the mock price feed
pub const MOCK_ORACLE_DECIMALS: u8 = 8;

/// The initial answer reported by the mock price feed, 3000 USD at 8 decimals
pub const DEFAULT_MOCK_ORACLE_ANSWER: i64 = 300_000_000_000;

/// The fee tiers a Uniswap v3 pool may be created with
pub const VALID_FEE_TIERS: [u32; 4] = [100, 500, 3000, 10000];
