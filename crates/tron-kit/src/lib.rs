//! A clean, ergonomic Rust client for TRON full nodes.
//!
//! **tron-kit** builds, signs and broadcasts TRX transfers against the
//! node's HTTP API, and optionally waits for the transaction's receipt.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tron_kit::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tron_kit::Error> {
//!     let tron = Tron::shasta()
//!         .private_key("68596c63d7230acc0916245c0b419978c831051d83ea46f3611a23d91a0c2b34")?
//!         .build();
//!
//!     let outcome = tron
//!         .transfer("TYd8oTYpaE7YJR4sS7HT8tRzAFUG8RqwxD", "1.5 TRX")
//!         .wait_for_confirmation(30)
//!         .await?;
//!
//!     match outcome.receipt_error() {
//!         Some(failure) => println!("included but failed: {}", failure),
//!         None => println!("sent {}", outcome.hash),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # How a transfer travels
//!
//! 1. The latest block is fetched and its height and id become the
//!    transaction's reference block. Expiration is now + 10 minutes.
//! 2. The raw transaction is protobuf-encoded and hashed with SHA-256; the
//!    hash is the transaction id and is signed with secp256k1.
//! 3. The signed transaction is broadcast. A non-zero response code is an
//!    [`Error::BroadcastRejected`], distinct from a transport [`Error::Rpc`].
//! 4. If asked, the transaction info is polled once per second until it
//!    shows up or the wait runs out.
//!
//! # String Parsing
//!
//! ```
//! use tron_kit::{Address, Trx};
//!
//! let amount: Trx = "2.5 TRX".parse().unwrap();
//! assert_eq!(amount.as_sun(), 2_500_000);
//!
//! let address: Address = "TRZar2KkBCxJw3kPHScNUf11bHPV7gj67r".parse().unwrap();
//! assert_eq!(address.to_hex(), "41ab0a439b8bf6386546d79e67f14006df7a73047b");
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{
    Error, ParseAddressError, ParseAmountError, ParseHashError, ParseKeyError, ReceiptError,
    RpcError, SignerError,
};
pub use types::*;

pub use client::{
    Behavior, EnvSigner, InMemorySigner, RetryConfig, RpcClient, Signer, SigningBackend,
    SigningKey, TransactionController, TransactionOutcome, TransferBuilder, Tron, TronBuilder,
};
