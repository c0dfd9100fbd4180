//! Error types for tron-kit.
//!
//! This module provides the error types for all tron-kit operations.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error) - Main error type, returned by most operations
//!   - [`RpcError`] - Transport and node errors (network, account not found, etc.)
//!   - [`ParseAddressError`] - Invalid address format
//!   - [`ParseAmountError`] - Invalid TRX amount format
//!   - [`ParseKeyError`] - Invalid key format
//!   - [`ParseHashError`] - Invalid transaction hash format
//!   - [`SignerError`] - Signing operation failures
//!
//! Failures are layered the same way a transaction travels:
//!
//! 1. Transport errors ([`Error::Rpc`]) - the node could not be reached or
//!    returned something unusable.
//! 2. Broadcast rejections ([`Error::BroadcastRejected`]) - the node answered
//!    but refused the transaction with a non-zero response code.
//! 3. Receipt failures ([`ReceiptError`]) - the transaction was included in a
//!    block but its execution failed. These are *not* returned as `Err` from
//!    the lifecycle itself; see
//!    [`TransactionOutcome::receipt_error`](crate::TransactionOutcome::receipt_error).
//!
//! # Example
//!
//! ```rust,no_run
//! use tron_kit::*;
//!
//! # async fn example() -> Result<(), Error> {
//! let tron = Tron::shasta().build();
//!
//! match tron.account("TYd8oTYpaE7YJR4sS7HT8tRzAFUG8RqwxD").await {
//!     Ok(account) => println!("Balance: {}", account.balance),
//!     Err(Error::Rpc(RpcError::AccountNotFound(address))) => {
//!         println!("Account {} is not activated", address);
//!     }
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

use crate::types::{Address, ResponseCode, TxHash};

/// Error parsing an address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAddressError {
    #[error("Address is empty")]
    Empty,

    #[error("Invalid base58check address '{0}'")]
    InvalidBase58(String),

    #[error("Address '{0}' has an invalid checksum")]
    InvalidChecksum(String),

    #[error("Invalid hex address '{0}'")]
    InvalidHex(String),

    #[error("Invalid address length: expected 21 bytes, got {0}")]
    InvalidLength(usize),

    #[error("Invalid address prefix 0x{0:02x}: expected 0x41")]
    InvalidPrefix(u8),
}

/// Error parsing a TRX amount.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("Ambiguous amount '{0}'. Use explicit units like '5 TRX' or '1000 sun'")]
    AmbiguousAmount(String),

    #[error("Invalid amount format: '{0}'")]
    InvalidFormat(String),

    #[error("Invalid number in amount: '{0}'")]
    InvalidNumber(String),

    #[error("Amount overflow: value too large")]
    Overflow,
}

/// Error parsing a secret key, public key or signature.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid secret key: scalar is zero or out of range")]
    InvalidScalar,

    #[error("Invalid curve point: key bytes do not represent a valid point on the curve")]
    InvalidCurvePoint,

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}

/// Error parsing a transaction hash.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseHashError {
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid hash length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Error during signing operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

// ============================================================================
// RPC Errors
// ============================================================================

/// Transport and node errors.
#[derive(Debug, Error)]
pub enum RpcError {
    // ─── Network/Transport ───
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        retryable: bool,
    },

    #[error("Timeout after {0} attempts")]
    Timeout(u32),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    // ─── Node Errors ───
    #[error("Node error: {message}")]
    Node { message: String },

    #[error("Transaction creation failed: {0}")]
    TransactionCreation(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(TxHash),

    #[error("Account not found: {0}")]
    AccountNotFound(Address),

    #[error("Server busy: {0}")]
    ServerBusy(String),
}

impl RpcError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            RpcError::Http(e) => e.is_timeout() || e.is_connect(),
            RpcError::Timeout(_) => true,
            RpcError::Network { retryable, .. } => *retryable,
            RpcError::ServerBusy(_) => true,
            _ => false,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>, status_code: Option<u16>, retryable: bool) -> Self {
        RpcError::Network {
            message: message.into(),
            status_code,
            retryable,
        }
    }

    /// Returns true if this error indicates the transaction is not yet known to the node.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RpcError::TransactionNotFound(_))
    }

    /// Returns true if this error indicates the account was not found.
    pub fn is_account_not_found(&self) -> bool {
        matches!(self, RpcError::AccountNotFound(_))
    }
}

// ============================================================================
// Receipt Errors
// ============================================================================

/// Execution failure recorded in a confirmed transaction's receipt.
///
/// The transaction made it into a block, so it is final and its fee was
/// charged, but the contract did not execute successfully.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Transaction {hash} failed: {message}")]
pub struct ReceiptError {
    /// Hash of the failed transaction.
    pub hash: TxHash,
    /// Message reported by the node (`resMessage`), decoded to text.
    pub message: String,
}

// ============================================================================
// Main Error Type
// ============================================================================

/// Main error type for tron-kit operations.
#[derive(Debug, Error)]
pub enum Error {
    // ─── Configuration ───
    #[error("No signer configured. Call .signer() on TronBuilder or .sign_with() on the operation.")]
    NoSigner,

    #[error("Invalid configuration: {0}")]
    Config(String),

    // ─── Parsing ───
    #[error(transparent)]
    ParseAddress(#[from] ParseAddressError),

    #[error(transparent)]
    ParseAmount(#[from] ParseAmountError),

    #[error(transparent)]
    ParseKey(#[from] ParseKeyError),

    #[error(transparent)]
    ParseHash(#[from] ParseHashError),

    // ─── RPC ───
    #[error(transparent)]
    Rpc(#[from] RpcError),

    // ─── Transaction ───
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Bad transaction: {code}: {message}")]
    BroadcastRejected { code: ResponseCode, message: String },

    #[error("Could not confirm transaction {hash} after {waited_secs} seconds")]
    ConfirmationTimeout {
        hash: TxHash,
        waited_secs: u64,
        /// Last failed lookup, if any lookup failed for a reason other than "not found".
        last_error: Option<String>,
    },

    #[error(transparent)]
    TransactionFailed(#[from] ReceiptError),

    // ─── Signing ───
    #[error("Signing failed: {0}")]
    Signing(#[from] SignerError),

    // ─── Serialization ───
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Protobuf decode error: {0}")]
    Protobuf(#[from] prost::DecodeError),
}

impl Error {
    /// Returns true if the node rejected the transaction at broadcast time.
    pub fn is_broadcast_rejected(&self) -> bool {
        matches!(self, Error::BroadcastRejected { .. })
    }

    /// Returns true if this is a transport-level failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Rpc(_))
    }

    /// Returns true if the same request may succeed when retried later.
    ///
    /// Covers retryable transport errors and broadcast rejections caused by
    /// the node's state (busy, not enough peers) rather than by the transaction.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Rpc(e) => e.is_retryable(),
            Error::BroadcastRejected { code, .. } => code.is_transient(),
            _ => false,
        }
    }
}
