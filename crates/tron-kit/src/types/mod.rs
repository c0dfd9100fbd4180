//! Core types for TRON.
//!
//! Addresses, keys, amounts and the transaction encoding, plus the response
//! shapes of the node's HTTP API.

mod address;
mod hash;
mod key;
mod network;
pub mod proto;
mod rpc;
mod transaction;
mod units;

pub use address::{ADDRESS_LEN, ADDRESS_PREFIX, Address, IntoAddress};
pub use hash::TxHash;
pub use key::{PublicKey, SecretKey, Signature};
pub use network::{MAINNET_URL, NILE_URL, Network, SHASTA_URL};
pub use rpc::{
    AccountView, AssetBalance, AssetIssue, AssetIssueList, BlockHeader, BlockRawData, BlockView,
    BroadcastResult, CreatedTransaction, Node, NodeAddress, NodeList, ReceiptCode,
    ResourceReceipt, ResponseCode, TransactionInfo, Witness, WitnessList,
};
pub(crate) use rpc::decode_hex_text;
pub(crate) use transaction::now_millis;
pub use transaction::{
    BlockRef, DEFAULT_EXPIRATION, DEFAULT_FEE_LIMIT, Transaction, TransactionOptions,
};
pub use units::{IntoTrx, Trx};
