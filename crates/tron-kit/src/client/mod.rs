//! Client module for talking to a TRON full node.
//!
//! - [`Tron`] - The main client, the single entry point for all operations
//! - [`TronBuilder`] - Fluent builder for configuring the client
//! - [`RpcClient`] - Low-level HTTP client with retry logic
//!
//! # Signers
//!
//! | Signer | Use Case |
//! |--------|----------|
//! | [`InMemorySigner`] | Scripts with a private key in memory |
//! | [`EnvSigner`] | CI/CD via the `TRON_PRIVATE_KEY` env var |
//!
//! Custom backends (hardware wallets, remote signers) implement
//! [`SigningBackend`] and are wrapped in a [`SigningKey`].
//!
//! # Sending transactions
//!
//! - [`TransferBuilder`] - Build, sign and broadcast a TRX transfer
//! - [`TransactionController`] - Drive any transaction through
//!   sign → broadcast → confirm

mod controller;
mod rpc;
mod signer;
mod transfer;
mod tron;

pub use controller::{Behavior, DEFAULT_POLL_INTERVAL, TransactionController};
pub use rpc::{API_KEY_HEADER, DEFAULT_TIMEOUT, RetryConfig, RpcClient};
pub use signer::{EnvSigner, InMemorySigner, PRIVATE_KEY_ENV, Signer, SigningBackend, SigningKey};
pub use transfer::{TransactionOutcome, TransferBuilder};
pub use tron::{API_KEY_ENV, NETWORK_ENV, Tron, TronBuilder};
