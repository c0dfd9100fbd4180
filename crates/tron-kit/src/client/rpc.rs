//! Low-level client for the TRON full node HTTP API.
//!
//! Every call is a `POST {url}/wallet/<method>` with a JSON body. Addresses
//! are sent in hex form. The node reports failures in-band with a 200 status
//! and an `{"Error": "..."}` body, and answers lookups for unknown objects
//! with an empty object `{}`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::error::RpcError;
use crate::types::proto::TransferContract;
use crate::types::{
    AccountView, Address, AssetIssueList, BlockView, BroadcastResult, CreatedTransaction,
    NodeList, Transaction, TransactionInfo, TxHash, WitnessList, decode_hex_text,
};

/// Header carrying the TronGrid API key.
pub const API_KEY_HEADER: &str = "TRON-PRO-API-KEY";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Retry configuration for RPC calls.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Maximum number of retries.
    pub max_retries: u32,
    /// Initial delay in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 5000,
        }
    }
}

impl RetryConfig {
    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Backoff before retry number `attempt + 1`.
    fn delay(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt))
            .min(self.max_delay_ms);
        Duration::from_millis(delay)
    }
}

/// Low-level HTTP client for a TRON full node.
pub struct RpcClient {
    url: String,
    client: reqwest::Client,
    retry_config: RetryConfig,
    timeout: Duration,
    api_key: Option<String>,
    request_id: AtomicU64,
}

impl RpcClient {
    /// Create a new RPC client with the given base URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_retry_config(url, RetryConfig::default())
    }

    /// Create a new RPC client with custom retry configuration.
    pub fn with_retry_config(url: impl Into<String>, retry_config: RetryConfig) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            retry_config,
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
            request_id: AtomicU64::new(0),
        }
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send an API key with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Get the base URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the retry configuration.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    /// Make a raw call with retries, returning the response body as JSON.
    pub async fn call_value<P: Serialize>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<Value, RpcError> {
        let total_attempts = self.retry_config.max_retries + 1;

        for attempt in 0..total_attempts {
            let request_id = self.request_id.fetch_add(1, Ordering::Relaxed);
            debug!(method, request_id, attempt, "rpc call");

            match self.try_call(method, params).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < total_attempts - 1 => {
                    let delay = self.retry_config.delay(attempt);
                    warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {:?}",
                        method,
                        attempt + 1,
                        total_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(RpcError::Timeout(total_attempts))
    }

    /// Make a raw call with retries and deserialize the response.
    pub async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<R, RpcError> {
        let value = self.call_value(method, params).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Single attempt.
    async fn try_call<P: Serialize>(&self, method: &str, params: &P) -> Result<Value, RpcError> {
        let mut request = self
            .client
            .post(format!("{}/wallet/{}", self.url, method))
            .timeout(self.timeout)
            .json(params);
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let retryable = is_retryable_status(status.as_u16());
            return Err(RpcError::network(
                format!("HTTP {}: {}", status, body),
                Some(status.as_u16()),
                retryable,
            ));
        }

        if body.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }

        let value: Value = serde_json::from_str(&body)?;
        if let Some(message) = value.get("Error").and_then(Value::as_str) {
            return Err(parse_node_error(message));
        }
        Ok(value)
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Ask the node to build an unsigned TRX transfer.
    ///
    /// The returned transaction's id is checked against the hash of the raw
    /// data the node sent, so signing it signs what the node will verify.
    pub async fn create_transaction(
        &self,
        contract: &TransferContract,
    ) -> Result<Transaction, RpcError> {
        let params = json!({
            "owner_address": hex::encode(&contract.owner_address),
            "to_address": hex::encode(&contract.to_address),
            "amount": contract.amount,
        });

        let value = match self.call_value("createtransaction", &params).await {
            Ok(value) => value,
            Err(RpcError::Node { message }) => return Err(RpcError::TransactionCreation(message)),
            Err(e) => return Err(e),
        };
        if is_empty_object(&value) {
            return Err(RpcError::TransactionCreation("bad transaction".to_string()));
        }

        let created: CreatedTransaction = serde_json::from_value(value)?;
        if let Some(message) = created.error {
            return Err(RpcError::TransactionCreation(message));
        }
        let raw_hex = created
            .raw_data_hex
            .ok_or_else(|| RpcError::InvalidResponse("missing raw_data_hex".to_string()))?;
        let tx = Transaction::from_raw_hex(&raw_hex)
            .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;

        if let Some(tx_id) = created.tx_id {
            if tx_id != tx.hash() {
                return Err(RpcError::InvalidResponse(format!(
                    "txID {} does not match raw data hash {}",
                    tx_id,
                    tx.hash()
                )));
            }
        }
        Ok(tx)
    }

    /// Submit a signed transaction.
    ///
    /// A rejection by the node is reported in the returned [`BroadcastResult`],
    /// not as an error; only transport failures are errors here.
    pub async fn broadcast(&self, tx: &Transaction) -> Result<BroadcastResult, RpcError> {
        let params = json!({ "transaction": tx.to_hex() });
        let result: BroadcastResult = self.call("broadcasthex", &params).await?;
        info!(
            "broadcast {}: {} {}",
            tx.hash(),
            result.code,
            result.message
        );
        Ok(result)
    }

    /// Look up the execution info of a transaction.
    ///
    /// Returns [`RpcError::TransactionNotFound`] until the transaction is in a block.
    pub async fn transaction_info_by_id(&self, hash: &TxHash) -> Result<TransactionInfo, RpcError> {
        let params = json!({ "value": hash.to_string() });
        let value = self.call_value("gettransactioninfobyid", &params).await?;
        if is_empty_object(&value) {
            return Err(RpcError::TransactionNotFound(*hash));
        }
        Ok(serde_json::from_value(value)?)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get the latest block.
    pub async fn now_block(&self) -> Result<BlockView, RpcError> {
        self.call("getnowblock", &json!({})).await
    }

    /// Get a block by height.
    pub async fn block_by_num(&self, number: i64) -> Result<BlockView, RpcError> {
        let value = self
            .call_value("getblockbynum", &json!({ "num": number }))
            .await?;
        if is_empty_object(&value) {
            return Err(RpcError::InvalidResponse(format!(
                "block {} not found",
                number
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Get account information.
    pub async fn account(&self, address: &Address) -> Result<AccountView, RpcError> {
        let params = json!({ "address": address.to_hex() });
        let value = self.call_value("getaccount", &params).await?;
        if is_empty_object(&value) {
            return Err(RpcError::AccountNotFound(*address));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// List super representative candidates.
    pub async fn list_witnesses(&self) -> Result<WitnessList, RpcError> {
        self.call("listwitnesses", &json!({})).await
    }

    /// List peers known to the node.
    pub async fn list_nodes(&self) -> Result<NodeList, RpcError> {
        self.call("listnodes", &json!({})).await
    }

    /// List TRC-10 tokens issued by an account.
    pub async fn asset_issue_by_account(
        &self,
        address: &Address,
    ) -> Result<AssetIssueList, RpcError> {
        let params = json!({ "address": address.to_hex() });
        self.call("getassetissuebyaccount", &params).await
    }
}

impl Clone for RpcClient {
    fn clone(&self) -> Self {
        Self {
            url: self.url.clone(),
            client: self.client.clone(),
            retry_config: self.retry_config.clone(),
            timeout: self.timeout,
            api_key: self.api_key.clone(),
            request_id: AtomicU64::new(0),
        }
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("url", &self.url)
            .field("retry_config", &self.retry_config)
            .field("timeout", &self.timeout)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if an HTTP status code is retryable.
fn is_retryable_status(status: u16) -> bool {
    // 408 Request Timeout, 429 Too Many Requests, 5xx Server Errors
    status == 408 || status == 429 || (500..600).contains(&status)
}

fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(|map| map.is_empty())
}

/// Map an in-band `Error` message to a typed error.
fn parse_node_error(message: &str) -> RpcError {
    let message = decode_hex_text(message);
    if message.to_ascii_lowercase().contains("server busy")
        || message.to_ascii_lowercase().contains("server is busy")
    {
        return RpcError::ServerBusy(message);
    }
    RpcError::Node { message }
}
