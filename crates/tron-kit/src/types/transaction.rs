//! Transaction types.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use prost::Message;

use crate::error::{Error, SignerError};

use super::proto::{Contract, SignedTransactionProto, TransactionRaw, TransferContract};
use super::{Address, SecretKey, Signature, Trx, TxHash};

/// Default fee limit (100 TRX).
pub const DEFAULT_FEE_LIMIT: Trx = Trx::sun(100_000_000);

/// Default validity window of a locally built transaction.
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(600);

/// Current wall-clock time in milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

// ============================================================================
// BlockRef
// ============================================================================

/// Reference to a recent block, binding a transaction to one chain fork (TaPoS).
///
/// The node rejects a transaction whose reference block is unknown to it,
/// which also bounds how long a transaction can sit before broadcast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockRef {
    /// Bytes 6..8 of the big-endian block height.
    pub bytes: [u8; 2],
    /// Bytes 8..16 of the block id.
    pub hash: [u8; 8],
}

impl BlockRef {
    /// Derive the reference from a block's height and id.
    pub fn from_block(number: i64, block_id: &TxHash) -> Self {
        let height = number.to_be_bytes();
        let id = block_id.as_bytes();

        let mut bytes = [0u8; 2];
        bytes.copy_from_slice(&height[6..8]);
        let mut hash = [0u8; 8];
        hash.copy_from_slice(&id[8..16]);
        Self { bytes, hash }
    }
}

// ============================================================================
// TransactionOptions
// ============================================================================

/// Knobs applied when building a transaction locally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionOptions {
    /// Memo stored in the raw `data` field.
    pub memo: Option<String>,
    /// Maximum energy fee the sender is willing to burn.
    pub fee_limit: Trx,
    /// How long after creation the transaction stays valid.
    pub expiration: Duration,
}

impl Default for TransactionOptions {
    fn default() -> Self {
        Self {
            memo: None,
            fee_limit: DEFAULT_FEE_LIMIT,
            expiration: DEFAULT_EXPIRATION,
        }
    }
}

// ============================================================================
// Transaction
// ============================================================================

/// A TRON transaction: raw data plus zero or more signatures.
///
/// The transaction id is the SHA-256 of the protobuf-encoded raw data, so it
/// does not change as signatures are added.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    raw_data: TransactionRaw,
    signatures: Vec<Signature>,
}

impl Transaction {
    /// Wrap raw data without signatures.
    pub fn new(raw_data: TransactionRaw) -> Self {
        Self {
            raw_data,
            signatures: Vec::new(),
        }
    }

    /// Build an unsigned transaction carrying a single contract.
    ///
    /// `timestamp` is `now_ms`; expiration is `now_ms` plus the configured
    /// validity window.
    pub fn build(
        contract: Contract,
        block_ref: BlockRef,
        options: &TransactionOptions,
        now_ms: i64,
    ) -> Self {
        let expiration_ms = i64::try_from(options.expiration.as_millis()).unwrap_or(i64::MAX);
        let raw_data = TransactionRaw {
            ref_block_bytes: block_ref.bytes.to_vec(),
            ref_block_hash: block_ref.hash.to_vec(),
            expiration: now_ms.saturating_add(expiration_ms),
            data: options
                .memo
                .as_ref()
                .map(|m| m.as_bytes().to_vec())
                .unwrap_or_default(),
            contract: vec![contract],
            timestamp: now_ms,
            fee_limit: options.fee_limit.as_sun(),
            ..Default::default()
        };
        Self::new(raw_data)
    }

    /// Build an unsigned TRX transfer stamped with the current time.
    pub fn transfer(
        owner: &Address,
        to: &Address,
        amount: Trx,
        block_ref: BlockRef,
        options: &TransactionOptions,
    ) -> Self {
        let contract = Contract::transfer(&TransferContract {
            owner_address: owner.to_vec(),
            to_address: to.to_vec(),
            amount: amount.as_sun(),
        });
        Self::build(contract, block_ref, options, now_millis())
    }

    /// Decode hex-encoded raw data, as returned by the node (`raw_data_hex`).
    ///
    /// Rejects input whose canonical re-encoding differs from the original
    /// bytes: the node hashes the bytes it was given, so a lossy decode would
    /// make every signature invalid.
    pub fn from_raw_hex(raw_hex: &str) -> Result<Self, Error> {
        let bytes = hex::decode(raw_hex)
            .map_err(|e| Error::InvalidTransaction(format!("Invalid raw data hex: {}", e)))?;
        let raw_data = TransactionRaw::decode(bytes.as_slice())?;
        if raw_data.encode_to_vec() != bytes {
            return Err(Error::InvalidTransaction(
                "raw data does not re-encode to the same bytes".to_string(),
            ));
        }
        Ok(Self::new(raw_data))
    }

    /// Decode a full (possibly signed) transaction from protobuf bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let proto = SignedTransactionProto::decode(bytes)?;
        let raw_data = proto
            .raw_data
            .ok_or_else(|| Error::InvalidTransaction("missing raw data".to_string()))?;
        let signatures = proto
            .signature
            .iter()
            .map(|s| Signature::from_bytes(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            raw_data,
            signatures,
        })
    }

    /// Decode a full transaction from hex.
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let bytes = hex::decode(s)
            .map_err(|e| Error::InvalidTransaction(format!("Invalid transaction hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// The raw data.
    pub fn raw_data(&self) -> &TransactionRaw {
        &self.raw_data
    }

    /// Signatures collected so far.
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// True once at least one signature is attached.
    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }

    /// Protobuf encoding of the raw data. This is what gets hashed.
    pub fn raw_bytes(&self) -> Vec<u8> {
        self.raw_data.encode_to_vec()
    }

    /// Transaction id: SHA-256 of [`raw_bytes`](Self::raw_bytes).
    pub fn hash(&self) -> TxHash {
        TxHash::hash(&self.raw_bytes())
    }

    /// Sign with a secret key and append the signature.
    pub fn sign(&mut self, key: &SecretKey) -> Result<(), SignerError> {
        let signature = key.sign_prehash(&self.hash())?;
        self.signatures.push(signature);
        Ok(())
    }

    /// Append an externally produced signature.
    pub fn add_signature(&mut self, signature: Signature) {
        self.signatures.push(signature);
    }

    /// Protobuf encoding of the full transaction (raw data + signatures).
    pub fn to_bytes(&self) -> Vec<u8> {
        SignedTransactionProto {
            raw_data: Some(self.raw_data.clone()),
            signature: self.signatures.iter().map(Signature::to_vec).collect(),
        }
        .encode_to_vec()
    }

    /// Hex of [`to_bytes`](Self::to_bytes), the form accepted by `broadcasthex`.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Expiration time in milliseconds since the Unix epoch.
    pub fn expiration(&self) -> i64 {
        self.raw_data.expiration
    }

    /// True if the transaction is past its expiration at `now_ms`.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.raw_data.expiration
    }

    /// The TRX transfer carried by this transaction, if any.
    pub fn transfer_contract(&self) -> Option<TransferContract> {
        self.raw_data.contract.first()?.as_transfer()
    }

    /// Memo text, if the raw `data` field holds valid UTF-8.
    pub fn memo(&self) -> Option<&str> {
        if self.raw_data.data.is_empty() {
            return None;
        }
        std::str::from_utf8(&self.raw_data.data).ok()
    }
}
