//! TRX transfer builder.
//!
//! ```rust,no_run
//! # use tron_kit::*;
//! # async fn example() -> Result<(), Error> {
//! let tron = Tron::shasta()
//!     .private_key("68596c63d7230acc0916245c0b419978c831051d83ea46f3611a23d91a0c2b34")?
//!     .build();
//!
//! // Fire and forget
//! let outcome = tron.transfer("TYd8oTYpaE7YJR4sS7HT8tRzAFUG8RqwxD", "1 TRX").await?;
//! println!("sent {}", outcome.hash);
//!
//! // Wait up to 30 seconds for the receipt, fail if execution failed
//! let outcome = tron
//!     .transfer("TYd8oTYpaE7YJR4sS7HT8tRzAFUG8RqwxD", Trx::sun(1_500_000))
//!     .memo("invoice 42")
//!     .wait_for_confirmation(30)
//!     .await?
//!     .into_result()?;
//! println!("fee: {}", outcome.receipt.map(|r| r.fee).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::{Error, ReceiptError};
use crate::types::{
    Address, BroadcastResult, IntoAddress, IntoTrx, Transaction, TransactionInfo,
    TransactionOptions, Trx, TxHash,
};

use super::controller::{Behavior, TransactionController};
use super::rpc::RpcClient;
use super::signer::Signer;

// ============================================================================
// TransactionOutcome
// ============================================================================

/// What happened to a transaction run through a [`TransactionController`].
#[derive(Clone, Debug)]
pub struct TransactionOutcome {
    /// Transaction id.
    pub hash: TxHash,
    /// The signed transaction.
    pub transaction: Transaction,
    /// Broadcast result (`None` for dry runs).
    pub result: Option<BroadcastResult>,
    /// Transaction info (`None` unless confirmation was requested).
    pub receipt: Option<TransactionInfo>,
}

impl TransactionOutcome {
    /// True if the node accepted the broadcast.
    pub fn is_broadcast(&self) -> bool {
        self.result.as_ref().is_some_and(BroadcastResult::is_success)
    }

    /// True if a receipt was observed.
    pub fn is_confirmed(&self) -> bool {
        self.receipt.is_some()
    }

    /// Execution failure recorded in the receipt, if any.
    pub fn receipt_error(&self) -> Option<ReceiptError> {
        let message = self.receipt.as_ref()?.failure_message()?;
        Some(ReceiptError {
            hash: self.hash,
            message,
        })
    }

    /// Turn an execution failure into an error.
    pub fn into_result(self) -> Result<Self, Error> {
        match self.receipt_error() {
            Some(e) => Err(e.into()),
            None => Ok(self),
        }
    }
}

// ============================================================================
// TransferBuilder
// ============================================================================

/// Builder for a TRX transfer, created by [`Tron::transfer`](crate::Tron::transfer).
///
/// Await it to build, sign, broadcast and (optionally) confirm the transfer.
pub struct TransferBuilder {
    rpc: Arc<RpcClient>,
    signer: Option<Arc<dyn Signer>>,
    signer_override: Option<Arc<dyn Signer>>,
    from: Option<Result<Address, Error>>,
    to: Result<Address, Error>,
    amount: Result<Trx, Error>,
    fee_limit: Result<Trx, Error>,
    options: TransactionOptions,
    behavior: Behavior,
}

impl TransferBuilder {
    pub(crate) fn new(
        rpc: Arc<RpcClient>,
        signer: Option<Arc<dyn Signer>>,
        to: impl IntoAddress,
        amount: impl IntoTrx,
    ) -> Self {
        let options = TransactionOptions::default();
        Self {
            rpc,
            signer,
            signer_override: None,
            from: None,
            to: to.into_address().map_err(Error::from),
            amount: amount.into_trx().map_err(Error::from),
            fee_limit: Ok(options.fee_limit),
            options,
            behavior: Behavior::default(),
        }
    }

    /// Send from a different address than the signer's (e.g. a multi-signature account).
    pub fn from(mut self, from: impl IntoAddress) -> Self {
        self.from = Some(from.into_address().map_err(Error::from));
        self
    }

    /// Attach a memo.
    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.options.memo = Some(memo.into());
        self
    }

    /// Set the fee limit (default 100 TRX).
    pub fn fee_limit(mut self, fee_limit: impl IntoTrx) -> Self {
        self.fee_limit = fee_limit.into_trx().map_err(Error::from);
        self
    }

    /// Set how long the transaction stays valid (default 10 minutes).
    pub fn expiration(mut self, expiration: Duration) -> Self {
        self.options.expiration = expiration;
        self
    }

    /// Poll for the receipt for up to `secs` seconds after broadcasting.
    pub fn wait_for_confirmation(mut self, secs: u64) -> Self {
        self.behavior.confirmation_wait_secs = secs;
        self
    }

    /// Delay between confirmation polls (default 1 second).
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.behavior.poll_interval = interval;
        self
    }

    /// Sign only; do not broadcast.
    pub fn dry_run(mut self) -> Self {
        self.behavior.dry_run = true;
        self
    }

    /// Override the signer for this transfer.
    pub fn sign_with(mut self, signer: impl Signer + 'static) -> Self {
        self.signer_override = Some(Arc::new(signer));
        self
    }

    fn active_signer(&self) -> Option<Arc<dyn Signer>> {
        self.signer_override.clone().or_else(|| self.signer.clone())
    }

    /// Build the unsigned transaction without sending it.
    ///
    /// Fetches the latest block for the reference block fields; everything
    /// else is assembled locally.
    pub async fn build(self) -> Result<Transaction, Error> {
        let signer = self.active_signer();
        let from = match self.from {
            Some(from) => from?,
            None => *signer.as_ref().ok_or(Error::NoSigner)?.address(),
        };
        let to = self.to?;
        let amount = self.amount?;
        let options = TransactionOptions {
            fee_limit: self.fee_limit?,
            ..self.options
        };

        if !amount.is_positive() {
            return Err(Error::InvalidTransaction(format!(
                "Transfer amount must be positive, got {}",
                amount
            )));
        }
        if from == to {
            return Err(Error::InvalidTransaction(
                "Cannot transfer TRX to the sending address".to_string(),
            ));
        }

        let block = self.rpc.now_block().await?;
        debug!(
            "building transfer {} -> {} ({}) on block {}",
            from,
            to,
            amount,
            block.number()
        );
        Ok(Transaction::transfer(
            &from,
            &to,
            amount,
            block.block_ref(),
            &options,
        ))
    }
}

impl IntoFuture for TransferBuilder {
    type Output = Result<TransactionOutcome, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            let signer = self.active_signer().ok_or(Error::NoSigner)?;
            let rpc = self.rpc.clone();
            let behavior = self.behavior.clone();

            let tx = self.build().await?;
            let mut controller =
                TransactionController::new(rpc, signer.as_ref(), tx).behavior(behavior);
            controller.execute().await?;
            Ok(controller.into_outcome())
        })
    }
}
