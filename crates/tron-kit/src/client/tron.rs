//! The main Tron client.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Error;
use crate::types::proto::TransferContract;
use crate::types::{
    AccountView, Address, AssetIssueList, BlockView, BroadcastResult, IntoAddress, IntoTrx,
    MAINNET_URL, NILE_URL, Network, NodeList, SHASTA_URL, Transaction, TransactionInfo, Trx,
    TxHash, WitnessList,
};

use super::controller::TransactionController;
use super::rpc::{RetryConfig, RpcClient};
use super::signer::{InMemorySigner, PRIVATE_KEY_ENV, Signer};
use super::transfer::TransferBuilder;

/// Environment variable selecting the network (or a node URL) in [`Tron::from_env`].
pub const NETWORK_ENV: &str = "TRON_NETWORK";
/// Environment variable holding a TronGrid API key in [`Tron::from_env`].
pub const API_KEY_ENV: &str = "TRON_API_KEY";

/// The main client for interacting with TRON.
///
/// Configure it with a signer to send transactions, or use it without one
/// for read-only queries.
///
/// # Example
///
/// ```rust,no_run
/// use tron_kit::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), tron_kit::Error> {
///     // Read-only client
///     let tron = Tron::shasta().build();
///     let balance = tron.balance("TRZar2KkBCxJw3kPHScNUf11bHPV7gj67r").await?;
///     println!("Balance: {}", balance);
///
///     // Client with a signer
///     let tron = Tron::shasta()
///         .private_key("68596c63d7230acc0916245c0b419978c831051d83ea46f3611a23d91a0c2b34")?
///         .build();
///     tron.transfer("TYd8oTYpaE7YJR4sS7HT8tRzAFUG8RqwxD", "1 TRX").await?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Tron {
    rpc: Arc<RpcClient>,
    signer: Option<Arc<dyn Signer>>,
    network: Network,
}

impl Tron {
    /// Create a builder for mainnet.
    pub fn mainnet() -> TronBuilder {
        TronBuilder::new(MAINNET_URL, Network::Mainnet)
    }

    /// Create a builder for the Shasta testnet.
    pub fn shasta() -> TronBuilder {
        TronBuilder::new(SHASTA_URL, Network::Shasta)
    }

    /// Create a builder for the Nile testnet.
    pub fn nile() -> TronBuilder {
        TronBuilder::new(NILE_URL, Network::Nile)
    }

    /// Create a builder for a node at a custom URL.
    pub fn custom(rpc_url: impl Into<String>) -> TronBuilder {
        TronBuilder::new(rpc_url, Network::Custom)
    }

    /// Create a configured client from environment variables.
    ///
    /// Reads:
    /// - `TRON_NETWORK` (optional): `"mainnet"`, `"shasta"`, `"nile"`, or a
    ///   node URL. Defaults to `"shasta"`.
    /// - `TRON_PRIVATE_KEY` (optional): hex private key for signing.
    /// - `TRON_API_KEY` (optional): TronGrid API key.
    ///
    /// Without `TRON_PRIVATE_KEY` the client is read-only.
    ///
    /// ```rust,no_run
    /// # use tron_kit::*;
    /// # async fn example() -> Result<(), tron_kit::Error> {
    /// let tron = Tron::from_env()?;
    /// tron.transfer("TYd8oTYpaE7YJR4sS7HT8tRzAFUG8RqwxD", "1 TRX").await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if `TRON_NETWORK` is neither a known network nor a
    /// URL, or if `TRON_PRIVATE_KEY` is not a valid key.
    pub fn from_env() -> Result<Tron, Error> {
        let network = std::env::var(NETWORK_ENV).ok();
        let private_key = std::env::var(PRIVATE_KEY_ENV).ok();
        let api_key = std::env::var(API_KEY_ENV).ok();

        let mut builder = match network.as_deref().map(str::trim) {
            None | Some("") => Tron::shasta(),
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                Tron::custom(url)
            }
            Some(name) => match name.parse::<Network>()? {
                Network::Mainnet => Tron::mainnet(),
                Network::Shasta => Tron::shasta(),
                Network::Nile => Tron::nile(),
                Network::Custom => {
                    return Err(Error::Config(format!(
                        "{} must be a network name or a node URL",
                        NETWORK_ENV
                    )));
                }
            },
        };

        if let Some(key) = private_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            builder = builder.private_key(key)?;
        }
        if let Some(api_key) = api_key.filter(|k| !k.trim().is_empty()) {
            builder = builder.api_key(api_key.trim());
        }

        Ok(builder.build())
    }

    /// Get the underlying RPC client.
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Get the node URL.
    pub fn rpc_url(&self) -> &str {
        self.rpc.url()
    }

    /// Get the signer's address, if a signer is configured.
    pub fn address(&self) -> Option<&Address> {
        self.signer.as_ref().map(|s| s.address())
    }

    /// Get the network this client is connected to.
    pub fn network(&self) -> Network {
        self.network
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get account information.
    ///
    /// Fails with `RpcError::AccountNotFound` for addresses that were never
    /// activated.
    pub async fn account(&self, address: impl IntoAddress) -> Result<AccountView, Error> {
        let address = address.into_address()?;
        Ok(self.rpc.account(&address).await?)
    }

    /// Get the TRX balance of an account.
    ///
    /// ```rust,no_run
    /// # use tron_kit::*;
    /// # async fn example() -> Result<(), tron_kit::Error> {
    /// let tron = Tron::mainnet().build();
    /// let balance = tron.balance("TRZar2KkBCxJw3kPHScNUf11bHPV7gj67r").await?;
    /// println!("{}", balance);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn balance(&self, address: impl IntoAddress) -> Result<Trx, Error> {
        Ok(self.account(address).await?.balance)
    }

    /// Get the latest block.
    pub async fn now_block(&self) -> Result<BlockView, Error> {
        Ok(self.rpc.now_block().await?)
    }

    /// Get a block by height.
    pub async fn block(&self, number: i64) -> Result<BlockView, Error> {
        Ok(self.rpc.block_by_num(number).await?)
    }

    /// List super representative candidates.
    pub async fn list_witnesses(&self) -> Result<WitnessList, Error> {
        Ok(self.rpc.list_witnesses().await?)
    }

    /// List peers known to the node.
    pub async fn list_nodes(&self) -> Result<NodeList, Error> {
        Ok(self.rpc.list_nodes().await?)
    }

    /// List TRC-10 tokens issued by an account.
    pub async fn asset_issue_by_account(
        &self,
        address: impl IntoAddress,
    ) -> Result<AssetIssueList, Error> {
        let address = address.into_address()?;
        Ok(self.rpc.asset_issue_by_account(&address).await?)
    }

    /// Get the execution info of a transaction.
    ///
    /// Fails with `RpcError::TransactionNotFound` until it is in a block.
    pub async fn transaction_info(&self, hash: &TxHash) -> Result<TransactionInfo, Error> {
        Ok(self.rpc.transaction_info_by_id(hash).await?)
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Transfer TRX from the signer's account.
    ///
    /// Returns a builder; await it to sign and broadcast.
    ///
    /// ```rust,no_run
    /// # use tron_kit::*;
    /// # async fn example(tron: Tron) -> Result<(), tron_kit::Error> {
    /// let outcome = tron
    ///     .transfer("TYd8oTYpaE7YJR4sS7HT8tRzAFUG8RqwxD", "2.5 TRX")
    ///     .wait_for_confirmation(20)
    ///     .await?;
    /// println!("confirmed: {}", outcome.is_confirmed());
    /// # Ok(())
    /// # }
    /// ```
    pub fn transfer(&self, to: impl IntoAddress, amount: impl IntoTrx) -> TransferBuilder {
        TransferBuilder::new(self.rpc.clone(), self.signer.clone(), to, amount)
    }

    /// Ask the node to build an unsigned TRX transfer.
    ///
    /// Unlike [`transfer`](Self::transfer), the node picks the reference
    /// block and expiration. Hand the result to [`controller`](Self::controller)
    /// to sign and send it.
    pub async fn create_transfer(
        &self,
        from: impl IntoAddress,
        to: impl IntoAddress,
        amount: impl IntoTrx,
    ) -> Result<Transaction, Error> {
        let contract = TransferContract {
            owner_address: from.into_address()?.to_vec(),
            to_address: to.into_address()?.to_vec(),
            amount: amount.into_trx()?.as_sun(),
        };
        Ok(self.rpc.create_transaction(&contract).await?)
    }

    /// Wrap a transaction in a [`TransactionController`] using the configured signer.
    pub fn controller(&self, tx: Transaction) -> Result<TransactionController, Error> {
        let signer = self.signer.as_ref().ok_or(Error::NoSigner)?;
        Ok(TransactionController::new(
            self.rpc.clone(),
            signer.as_ref(),
            tx,
        ))
    }

    /// Broadcast an already signed transaction.
    ///
    /// A rejection by the node is returned as [`Error::BroadcastRejected`].
    pub async fn send(&self, tx: &Transaction) -> Result<BroadcastResult, Error> {
        if !tx.is_signed() {
            return Err(Error::InvalidTransaction(format!(
                "transaction {} has no signatures",
                tx.hash()
            )));
        }
        let result = self.rpc.broadcast(tx).await?;
        if !result.is_success() {
            return Err(Error::BroadcastRejected {
                code: result.code,
                message: result.message,
            });
        }
        Ok(result)
    }
}

impl std::fmt::Debug for Tron {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tron")
            .field("rpc", &self.rpc)
            .field("address", &self.address())
            .field("network", &self.network)
            .finish()
    }
}

/// Builder for creating a [`Tron`] client.
///
/// ```rust
/// use std::time::Duration;
/// use tron_kit::*;
///
/// let tron = Tron::nile()
///     .api_key("my-trongrid-key")
///     .timeout(Duration::from_secs(5))
///     .retry_config(RetryConfig::none())
///     .build();
/// assert_eq!(tron.network(), Network::Nile);
/// ```
pub struct TronBuilder {
    rpc_url: String,
    signer: Option<Arc<dyn Signer>>,
    retry_config: RetryConfig,
    timeout: Option<Duration>,
    api_key: Option<String>,
    network: Network,
}

impl TronBuilder {
    fn new(rpc_url: impl Into<String>, network: Network) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            signer: None,
            retry_config: RetryConfig::default(),
            timeout: None,
            api_key: None,
            network,
        }
    }

    /// Set the signer for transactions.
    pub fn signer(mut self, signer: impl Signer + 'static) -> Self {
        self.signer = Some(Arc::new(signer));
        self
    }

    /// Sign with a hex-encoded private key.
    ///
    /// Shorthand for `.signer(InMemorySigner::new(key)?)`.
    pub fn private_key(mut self, private_key: impl AsRef<str>) -> Result<Self, Error> {
        let signer = InMemorySigner::new(private_key)?;
        self.signer = Some(Arc::new(signer));
        Ok(self)
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send a TronGrid API key with every request.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Tron {
        let mut rpc = RpcClient::with_retry_config(self.rpc_url, self.retry_config);
        if let Some(timeout) = self.timeout {
            rpc = rpc.with_timeout(timeout);
        }
        if let Some(api_key) = self.api_key {
            rpc = rpc.with_api_key(api_key);
        }
        Tron {
            rpc: Arc::new(rpc),
            signer: self.signer,
            network: self.network,
        }
    }
}

impl From<TronBuilder> for Tron {
    fn from(builder: TronBuilder) -> Self {
        builder.build()
    }
}
