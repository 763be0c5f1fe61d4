//! The chain capability the deployment pipeline runs against, and its
//! alloy-backed implementation

use std::{
    fmt::{self, Display},
    future::Future,
    time::Duration,
};

use alloy::{
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, Bytes, TxHash, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::{constants::RECEIPT_POLL_INTERVAL_MS, errors::ScriptError};

/// An error reported by the chain client, mapped by each stage into its own
/// error category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError(pub String);

impl Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ClientError {}

/// The outcome of a transaction that was included in a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Whether execution succeeded; `false` means the transaction reverted
    pub success: bool,
    /// The address of the created contract, for creation transactions
    pub contract_address: Option<Address>,
    /// The block the transaction was included in
    pub block_number: Option<u64>,
}

/// A signing identity bound to one network.
///
/// Implementations are single-owner for the duration of a run: callers must
/// not submit from two tasks at once, since both would draw from the same
/// nonce sequence.
pub trait ChainClient {
    /// The address transactions are signed with
    fn signer_address(&self) -> Address;

    /// The chain id the RPC endpoint reports
    fn chain_id(&self) -> impl Future<Output = Result<u64, ClientError>> + Send;

    /// The native balance of the signer
    fn signer_balance(&self) -> impl Future<Output = Result<U256, ClientError>> + Send;

    /// Submit a contract creation transaction with the given init code
    fn submit_creation(
        &self,
        init_code: Bytes,
    ) -> impl Future<Output = Result<TxHash, ClientError>> + Send;

    /// Submit a state-mutating call to `to`
    fn submit_call(
        &self,
        to: Address,
        calldata: Bytes,
    ) -> impl Future<Output = Result<TxHash, ClientError>> + Send;

    /// Block until `tx_hash` is included in a block, or the client gives up
    fn await_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = Result<Confirmation, ClientError>> + Send;

    /// Execute a read-only call against the latest state
    fn call(
        &self,
        to: Address,
        calldata: Bytes,
    ) -> impl Future<Output = Result<Bytes, ClientError>> + Send;
}

/// A [`ChainClient`] over a JSON-RPC endpoint, signing with a local key
#[derive(Clone)]
pub struct RpcClient {
    /// The provider, with the signer's wallet attached
    provider: DynProvider<Ethereum>,
    /// The signer's address
    address: Address,
    /// The endpoint the provider was connected to, if built from a URL
    endpoint: Option<Url>,
    /// The number of blocks a transaction must be buried under
    confirmations: u64,
    /// How long to wait for a receipt and its confirmations
    receipt_timeout: Duration,
}

impl RpcClient {
    /// Connect to `rpc_url`, signing with `signer`
    pub fn new(
        signer: PrivateKeySigner,
        rpc_url: Url,
        confirmations: u64,
        receipt_timeout: Duration,
    ) -> Self {
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(signer)
            .connect_http(rpc_url.clone());

        let mut client = Self::with_provider(
            DynProvider::new(provider),
            address,
            confirmations,
            receipt_timeout,
        );
        client.endpoint = Some(rpc_url);
        client
    }

    /// Wrap an already built provider that signs as `address`
    pub fn with_provider(
        provider: DynProvider<Ethereum>,
        address: Address,
        confirmations: u64,
        receipt_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            address,
            endpoint: None,
            confirmations,
            receipt_timeout,
        }
    }

    /// The endpoint the client was connected to
    pub fn endpoint(&self) -> Option<&Url> {
        self.endpoint.as_ref()
    }

    /// Wait until the chain head is `confirmations - 1` blocks past `included`
    async fn await_depth(&self, included: u64, deadline: Instant) -> Result<(), ClientError> {
        let target = included + self.confirmations - 1;
        loop {
            let head = self
                .provider
                .get_block_number()
                .await
                .map_err(|e| ClientError(e.to_string()))?;
            if head >= target {
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(ClientError(format!(
                    "chain head {} did not reach block {} within {:?}",
                    head, target, self.receipt_timeout
                )));
            }
            sleep(Duration::from_millis(RECEIPT_POLL_INTERVAL_MS)).await;
        }
    }
}

impl ChainClient for RpcClient {
    fn signer_address(&self) -> Address {
        self.address
    }

    async fn chain_id(&self) -> Result<u64, ClientError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ClientError(e.to_string()))
    }

    async fn signer_balance(&self) -> Result<U256, ClientError> {
        self.provider
            .get_balance(self.address)
            .await
            .map_err(|e| ClientError(e.to_string()))
    }

    async fn submit_creation(&self, init_code: Bytes) -> Result<TxHash, ClientError> {
        let tx = TransactionRequest::default()
            .with_from(self.address)
            .with_deploy_code(init_code);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ClientError(e.to_string()))?;

        Ok(*pending.tx_hash())
    }

    async fn submit_call(&self, to: Address, calldata: Bytes) -> Result<TxHash, ClientError> {
        let tx = TransactionRequest::default()
            .with_from(self.address)
            .with_to(to)
            .with_input(calldata);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ClientError(e.to_string()))?;

        Ok(*pending.tx_hash())
    }

    /// Polls for the receipt rather than watching the pending transaction,
    /// then waits for the configured depth
    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<Confirmation, ClientError> {
        debug!(tx_hash = %tx_hash, confirmations = self.confirmations, "awaiting receipt");
        let deadline = Instant::now() + self.receipt_timeout;

        let receipt = loop {
            let receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| ClientError(e.to_string()))?;
            if let Some(receipt) = receipt {
                break receipt;
            }

            if Instant::now() >= deadline {
                return Err(ClientError(format!(
                    "no receipt for {} within {:?}",
                    tx_hash, self.receipt_timeout
                )));
            }
            sleep(Duration::from_millis(RECEIPT_POLL_INTERVAL_MS)).await;
        };

        if let Some(included) = receipt.block_number {
            if self.confirmations > 1 {
                self.await_depth(included, deadline).await?;
            }
        }

        Ok(Confirmation {
            success: receipt.status(),
            contract_address: receipt.contract_address,
            block_number: receipt.block_number,
        })
    }

    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, ClientError> {
        let tx = TransactionRequest::default()
            .with_from(self.address)
            .with_to(to)
            .with_input(calldata);

        self.provider
            .call(tx)
            .await
            .map_err(|e| ClientError(e.to_string()))
    }
}

/// Build an [`RpcClient`] from a hex private key and an RPC URL
pub fn setup_client(
    priv_key: &str,
    rpc_url: &str,
    confirmations: u64,
    receipt_timeout: Duration,
) -> Result<RpcClient, ScriptError> {
    let signer: PrivateKeySigner = priv_key
        .trim()
        .parse()
        .map_err(|e| ScriptError::Configuration(format!("invalid private key: {}", e)))?;

    let url = Url::parse(rpc_url)
        .map_err(|e| ScriptError::Configuration(format!("invalid RPC URL {}: {}", rpc_url, e)))?;

    Ok(RpcClient::new(signer, url, confirmations, receipt_timeout))
}
