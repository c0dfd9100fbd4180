//! Node HTTP API response types.
//!
//! The full node encodes addresses and most byte strings as hex. Human
//! readable fields such as messages and token names are hex-encoded UTF-8;
//! those are decoded to text here.

use std::fmt::{self, Display};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{hex::Hex, serde_as};

use super::{Address, BlockRef, Trx, TxHash};

/// Decode hex-encoded UTF-8, falling back to the input if it is not hex.
pub(crate) fn decode_hex_text(s: &str) -> String {
    match hex::decode(s) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => s.to_string(),
    }
}

fn hex_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let s: Option<String> = Option::deserialize(d)?;
    Ok(s.as_deref().map(decode_hex_text).unwrap_or_default())
}

/// Names and numbers are both seen on the wire for enum-like fields.
#[derive(Deserialize)]
#[serde(untagged)]
enum NameOrNumber {
    Name(String),
    Number(i32),
}

// ============================================================================
// Block types
// ============================================================================

/// A block as returned by `getnowblock`.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockView {
    /// Block id: 8-byte big-endian height followed by 24 bytes of the header hash.
    #[serde(rename = "blockID")]
    pub block_id: TxHash,
    /// Header.
    pub block_header: BlockHeader,
    /// Transactions, kept as raw JSON.
    #[serde(default)]
    pub transactions: Vec<serde_json::Value>,
}

impl BlockView {
    /// Block height.
    pub fn number(&self) -> i64 {
        self.block_header.raw_data.number
    }

    /// Block production time in milliseconds.
    pub fn timestamp(&self) -> i64 {
        self.block_header.raw_data.timestamp
    }

    /// Reference usable for transactions built on top of this block.
    pub fn block_ref(&self) -> BlockRef {
        BlockRef::from_block(self.number(), &self.block_id)
    }
}

/// Block header.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockHeader {
    pub raw_data: BlockRawData,
    #[serde(default)]
    pub witness_signature: Option<String>,
}

/// Signed portion of a block header.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockRawData {
    /// Height (absent for the genesis block).
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, rename = "parentHash")]
    pub parent_hash: Option<TxHash>,
    #[serde(default, rename = "txTrieRoot")]
    pub tx_trie_root: Option<String>,
    #[serde(default)]
    pub witness_address: Option<Address>,
    #[serde(default)]
    pub version: Option<i32>,
}

// ============================================================================
// Broadcast
// ============================================================================

/// Response code returned by `broadcasttransaction` / `broadcasthex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResponseCode {
    #[default]
    Success,
    SigError,
    ContractValidateError,
    ContractExeError,
    BandwidthError,
    DupTransactionError,
    TaposError,
    TooBigTransactionError,
    TransactionExpirationError,
    ServerBusy,
    NoConnection,
    NotEnoughEffectiveConnection,
    OtherError,
}

impl ResponseCode {
    const ALL: [ResponseCode; 13] = [
        ResponseCode::Success,
        ResponseCode::SigError,
        ResponseCode::ContractValidateError,
        ResponseCode::ContractExeError,
        ResponseCode::BandwidthError,
        ResponseCode::DupTransactionError,
        ResponseCode::TaposError,
        ResponseCode::TooBigTransactionError,
        ResponseCode::TransactionExpirationError,
        ResponseCode::ServerBusy,
        ResponseCode::NoConnection,
        ResponseCode::NotEnoughEffectiveConnection,
        ResponseCode::OtherError,
    ];

    /// Numeric code as defined by the node.
    pub fn code(&self) -> i32 {
        match self {
            ResponseCode::Success => 0,
            ResponseCode::SigError => 1,
            ResponseCode::ContractValidateError => 2,
            ResponseCode::ContractExeError => 3,
            ResponseCode::BandwidthError => 4,
            ResponseCode::DupTransactionError => 5,
            ResponseCode::TaposError => 6,
            ResponseCode::TooBigTransactionError => 7,
            ResponseCode::TransactionExpirationError => 8,
            ResponseCode::ServerBusy => 9,
            ResponseCode::NoConnection => 10,
            ResponseCode::NotEnoughEffectiveConnection => 11,
            ResponseCode::OtherError => 20,
        }
    }

    /// Wire name as used by the node's JSON API.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::Success => "SUCCESS",
            ResponseCode::SigError => "SIGERROR",
            ResponseCode::ContractValidateError => "CONTRACT_VALIDATE_ERROR",
            ResponseCode::ContractExeError => "CONTRACT_EXE_ERROR",
            // Misspelled on the node side.
            ResponseCode::BandwidthError => "BANDWITH_ERROR",
            ResponseCode::DupTransactionError => "DUP_TRANSACTION_ERROR",
            ResponseCode::TaposError => "TAPOS_ERROR",
            ResponseCode::TooBigTransactionError => "TOO_BIG_TRANSACTION_ERROR",
            ResponseCode::TransactionExpirationError => "TRANSACTION_EXPIRATION_ERROR",
            ResponseCode::ServerBusy => "SERVER_BUSY",
            ResponseCode::NoConnection => "NO_CONNECTION",
            ResponseCode::NotEnoughEffectiveConnection => "NOT_ENOUGH_EFFECTIVE_CONNECTION",
            ResponseCode::OtherError => "OTHER_ERROR",
        }
    }

    /// Map a numeric code; unknown values become [`ResponseCode::OtherError`].
    pub fn from_code(code: i32) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .unwrap_or(ResponseCode::OtherError)
    }

    /// Map a wire name; unknown names become [`ResponseCode::OtherError`].
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == name)
            .unwrap_or(ResponseCode::OtherError)
    }

    /// True for [`ResponseCode::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseCode::Success)
    }

    /// True for transient node conditions worth resubmitting for.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ResponseCode::ServerBusy
                | ResponseCode::NoConnection
                | ResponseCode::NotEnoughEffectiveConnection
        )
    }
}

impl Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResponseCode {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResponseCode {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match NameOrNumber::deserialize(d)? {
            NameOrNumber::Name(name) => Self::from_name(&name),
            NameOrNumber::Number(code) => Self::from_code(code),
        })
    }
}

/// Result of broadcasting a signed transaction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BroadcastResult {
    /// `true` when the node accepted the transaction.
    #[serde(default)]
    pub result: bool,
    /// Response code; absent on success.
    #[serde(default)]
    pub code: ResponseCode,
    /// Node message, decoded from hex.
    #[serde(default, deserialize_with = "hex_text")]
    pub message: String,
    /// Id of the submitted transaction.
    #[serde(default)]
    pub txid: Option<TxHash>,
}

impl BroadcastResult {
    /// True when the node accepted the transaction.
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }
}

// ============================================================================
// Transaction info (receipt)
// ============================================================================

/// Execution result stored in a confirmed transaction's info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReceiptCode {
    #[default]
    Success,
    Failed,
}

impl ReceiptCode {
    /// Numeric code (0 for success).
    pub fn code(&self) -> i32 {
        match self {
            ReceiptCode::Success => 0,
            ReceiptCode::Failed => 1,
        }
    }

    /// True for [`ReceiptCode::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, ReceiptCode::Success)
    }
}

impl Display for ReceiptCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Spelled this way in the node's protobuf schema.
            ReceiptCode::Success => f.write_str("SUCESS"),
            ReceiptCode::Failed => f.write_str("FAILED"),
        }
    }
}

impl<'de> Deserialize<'de> for ReceiptCode {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match NameOrNumber::deserialize(d)? {
            NameOrNumber::Name(name) if name == "FAILED" => ReceiptCode::Failed,
            NameOrNumber::Name(_) => ReceiptCode::Success,
            NameOrNumber::Number(0) => ReceiptCode::Success,
            NameOrNumber::Number(_) => ReceiptCode::Failed,
        })
    }
}

/// Resource usage of a confirmed transaction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceReceipt {
    #[serde(default)]
    pub energy_usage: i64,
    #[serde(default)]
    pub energy_fee: i64,
    #[serde(default)]
    pub origin_energy_usage: i64,
    #[serde(default)]
    pub energy_usage_total: i64,
    #[serde(default)]
    pub net_usage: i64,
    #[serde(default)]
    pub net_fee: i64,
    /// Contract execution result (`SUCCESS`, `REVERT`, `OUT_OF_ENERGY`, ...).
    #[serde(default)]
    pub result: Option<String>,
}

/// Transaction info from `gettransactioninfobyid`.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionInfo {
    /// Transaction id.
    pub id: TxHash,
    /// Total fee burned, in SUN.
    #[serde(default)]
    pub fee: Trx,
    #[serde(default, rename = "blockNumber")]
    pub block_number: i64,
    #[serde(default, rename = "blockTimeStamp")]
    pub block_timestamp: i64,
    /// Raw contract return data.
    #[serde_as(as = "Vec<Hex>")]
    #[serde(default, rename = "contractResult")]
    pub contract_result: Vec<Vec<u8>>,
    #[serde(default)]
    pub contract_address: Option<Address>,
    #[serde(default)]
    pub receipt: ResourceReceipt,
    /// Absent on the wire when execution succeeded.
    #[serde(default)]
    pub result: ReceiptCode,
    /// Failure message, decoded from hex.
    #[serde(default, rename = "resMessage", deserialize_with = "hex_text")]
    pub res_message: String,
}

impl TransactionInfo {
    /// True if the transaction executed successfully.
    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }

    /// Why execution failed, or `None` if it succeeded.
    ///
    /// Prefers the node's `resMessage`, then the contract result
    /// (`REVERT`, `OUT_OF_ENERGY`, ...), then the result name.
    pub fn failure_message(&self) -> Option<String> {
        if self.is_success() {
            return None;
        }
        if !self.res_message.is_empty() {
            return Some(self.res_message.clone());
        }
        Some(
            self.receipt
                .result
                .clone()
                .unwrap_or_else(|| self.result.to_string()),
        )
    }
}

// ============================================================================
// Account
// ============================================================================

/// Account information from `getaccount`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountView {
    pub address: Address,
    /// Liquid TRX balance.
    #[serde(default)]
    pub balance: Trx,
    /// Account name, decoded from hex.
    #[serde(default, deserialize_with = "hex_text")]
    pub account_name: String,
    #[serde(default)]
    pub create_time: i64,
    #[serde(default, rename = "latest_opration_time")]
    pub latest_operation_time: i64,
    #[serde(default)]
    pub free_net_usage: i64,
    /// TRC-10 balances keyed by token id.
    #[serde(default, rename = "assetV2")]
    pub asset_v2: Vec<AssetBalance>,
}

/// One TRC-10 balance entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetBalance {
    pub key: String,
    pub value: i64,
}

// ============================================================================
// Network info
// ============================================================================

/// A super representative (block producer) candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Witness {
    pub address: Address,
    #[serde(default, rename = "voteCount")]
    pub vote_count: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "totalProduced")]
    pub total_produced: i64,
    #[serde(default, rename = "totalMissed")]
    pub total_missed: i64,
    #[serde(default, rename = "latestBlockNum")]
    pub latest_block_num: i64,
    #[serde(default, rename = "isJobs")]
    pub is_jobs: bool,
}

/// Response of `listwitnesses`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WitnessList {
    #[serde(default)]
    pub witnesses: Vec<Witness>,
}

/// A peer known to the node.
#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    pub address: NodeAddress,
}

/// Peer endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeAddress {
    /// Host, decoded from hex.
    #[serde(default, deserialize_with = "hex_text")]
    pub host: String,
    #[serde(default)]
    pub port: u16,
}

impl Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Response of `listnodes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeList {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// A TRC-10 token definition.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetIssue {
    /// Token id (numeric, as a string).
    #[serde(default)]
    pub id: String,
    pub owner_address: Address,
    #[serde(default, deserialize_with = "hex_text")]
    pub name: String,
    #[serde(default, deserialize_with = "hex_text")]
    pub abbr: String,
    #[serde(default)]
    pub total_supply: i64,
    #[serde(default)]
    pub precision: i32,
    #[serde(default)]
    pub trx_num: i64,
    #[serde(default)]
    pub num: i64,
    #[serde(default)]
    pub start_time: i64,
    #[serde(default)]
    pub end_time: i64,
    #[serde(default, deserialize_with = "hex_text")]
    pub description: String,
    #[serde(default, deserialize_with = "hex_text")]
    pub url: String,
}

/// Response of `getassetissuebyaccount`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetIssueList {
    #[serde(default, rename = "assetIssue")]
    pub asset_issue: Vec<AssetIssue>,
}

// ============================================================================
// Node-built transactions
// ============================================================================

/// Response of `createtransaction`: an unsigned transaction built by the node.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedTransaction {
    #[serde(default, rename = "txID")]
    pub tx_id: Option<TxHash>,
    #[serde(default)]
    pub raw_data_hex: Option<String>,
    /// Set instead of the fields above when the node refused to build.
    #[serde(default, rename = "Error")]
    pub error: Option<String>,
}
