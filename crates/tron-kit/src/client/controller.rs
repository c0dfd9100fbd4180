//! Transaction lifecycle: sign, broadcast, and optionally wait for a receipt.
//!
//! [`TransactionController`] takes an unsigned (or partially signed)
//! transaction through three steps. Each step runs only if the previous one
//! succeeded; the first error ends the run and is returned as-is.
//!
//! | Step | Failure |
//! |------|---------|
//! | sign | [`Error::Signing`] |
//! | send | [`Error::Rpc`] (transport) or [`Error::BroadcastRejected`] (node said no) |
//! | confirm | [`Error::ConfirmationTimeout`] |
//!
//! Failed lookups during confirmation are logged and polled again; the last
//! one is carried by the timeout error if the receipt never shows up.
//!
//! A transaction that is confirmed but whose execution failed is *not* an
//! error of the lifecycle: it is recorded in
//! [`result_error`](TransactionController::result_error).
//!
//! ```rust,no_run
//! use tron_kit::*;
//!
//! # async fn example(tron: Tron, tx: Transaction) -> Result<(), Error> {
//! let mut controller = tron.controller(tx)?.wait_for_confirmation(10);
//! controller.execute().await?;
//!
//! if let Some(failure) = controller.result_error() {
//!     println!("executed but failed: {}", failure);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{Error, ReceiptError};
use crate::types::{BroadcastResult, Transaction, TransactionInfo, TxHash, now_millis};

use super::rpc::RpcClient;
use super::signer::{Signer, SigningKey};
use super::transfer::TransactionOutcome;

/// Default delay between confirmation polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How a [`TransactionController`] runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Behavior {
    /// Sign only; do not broadcast or confirm.
    pub dry_run: bool,
    /// How long to poll for the receipt after broadcasting. Zero skips confirmation.
    pub confirmation_wait_secs: u64,
    /// Delay between confirmation polls.
    pub poll_interval: Duration,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            dry_run: false,
            confirmation_wait_secs: 0,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Drives one transaction through sign → send → confirm.
pub struct TransactionController {
    rpc: Arc<RpcClient>,
    key: SigningKey,
    tx: Transaction,
    behavior: Behavior,
    result: Option<BroadcastResult>,
    receipt: Option<TransactionInfo>,
    result_error: Option<ReceiptError>,
}

impl TransactionController {
    /// Create a controller that signs `tx` with `signer`.
    pub fn new(rpc: Arc<RpcClient>, signer: &dyn Signer, tx: Transaction) -> Self {
        Self::with_key(rpc, signer.key(), tx)
    }

    /// Create a controller from a signing key directly.
    pub fn with_key(rpc: Arc<RpcClient>, key: SigningKey, tx: Transaction) -> Self {
        Self {
            rpc,
            key,
            tx,
            behavior: Behavior::default(),
            result: None,
            receipt: None,
            result_error: None,
        }
    }

    /// Replace the behavior.
    pub fn behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Sign only.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.behavior.dry_run = dry_run;
        self
    }

    /// Poll for the receipt for up to `secs` seconds after broadcasting.
    pub fn wait_for_confirmation(mut self, secs: u64) -> Self {
        self.behavior.confirmation_wait_secs = secs;
        self
    }

    /// Delay between confirmation polls.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.behavior.poll_interval = interval;
        self
    }

    /// Current behavior.
    pub fn current_behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// Run the lifecycle.
    pub async fn execute(&mut self) -> Result<(), Error> {
        self.sign().await?;
        if self.behavior.dry_run {
            debug!("dry run: {} signed, not broadcasting", self.tx.hash());
            return Ok(());
        }
        self.send().await?;
        if self.behavior.confirmation_wait_secs > 0 {
            self.confirm().await?;
        }
        Ok(())
    }

    async fn sign(&mut self) -> Result<(), Error> {
        self.key.sign_transaction(&mut self.tx).await?;
        debug!(
            "signed {} ({} signature(s))",
            self.tx.hash(),
            self.tx.signatures().len()
        );
        Ok(())
    }

    async fn send(&mut self) -> Result<(), Error> {
        if self.tx.is_expired(now_millis()) {
            return Err(Error::InvalidTransaction(format!(
                "transaction {} expired at {}",
                self.tx.hash(),
                self.tx.expiration()
            )));
        }

        let result = self.rpc.broadcast(&self.tx).await?;
        if result.code.is_transient() {
            warn!(
                "{} refused with {}; the node may accept it if resubmitted",
                self.tx.hash(),
                result.code
            );
        }
        let rejected = (!result.is_success()).then(|| Error::BroadcastRejected {
            code: result.code,
            message: result.message.clone(),
        });
        self.result = Some(result);
        match rejected {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn confirm(&mut self) -> Result<(), Error> {
        let hash = self.tx.hash();
        let wait_secs = self.behavior.confirmation_wait_secs;
        let attempts = wait_secs.saturating_add(1);
        let mut last_error = None;

        for attempt in 0..attempts {
            match self.rpc.transaction_info_by_id(&hash).await {
                Ok(info) => {
                    match info.failure_message() {
                        None => info!("{} confirmed in block {}", hash, info.block_number),
                        Some(message) => {
                            warn!("{} confirmed but failed: {}", hash, message);
                            self.result_error = Some(ReceiptError { hash, message });
                        }
                    }
                    self.receipt = Some(info);
                    return Ok(());
                }
                Err(e) if e.is_not_found() => {
                    debug!("{} not confirmed yet (attempt {})", hash, attempt + 1);
                }
                Err(e) => {
                    warn!("{} lookup failed (attempt {}): {}", hash, attempt + 1, e);
                    last_error = Some(e.to_string());
                }
            }

            if attempt + 1 < attempts {
                tokio::time::sleep(self.behavior.poll_interval).await;
            }
        }

        Err(Error::ConfirmationTimeout {
            hash,
            waited_secs: wait_secs,
            last_error,
        })
    }

    /// Id of the transaction being driven.
    pub fn transaction_hash(&self) -> TxHash {
        self.tx.hash()
    }

    /// The transaction, with any signatures added so far.
    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    /// Broadcast result, once sent.
    pub fn result(&self) -> Option<&BroadcastResult> {
        self.result.as_ref()
    }

    /// Transaction info, once confirmed.
    pub fn receipt(&self) -> Option<&TransactionInfo> {
        self.receipt.as_ref()
    }

    /// Execution failure recorded in the receipt, if any.
    pub fn result_error(&self) -> Option<&ReceiptError> {
        self.result_error.as_ref()
    }

    /// Consume the controller into its outcome.
    pub fn into_outcome(self) -> TransactionOutcome {
        TransactionOutcome {
            hash: self.tx.hash(),
            transaction: self.tx,
            result: self.result,
            receipt: self.receipt,
        }
    }
}

impl std::fmt::Debug for TransactionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionController")
            .field("hash", &self.tx.hash())
            .field("behavior", &self.behavior)
            .field("result", &self.result)
            .field("receipt", &self.receipt)
            .finish()
    }
}
