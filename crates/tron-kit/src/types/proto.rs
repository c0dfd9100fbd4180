//! Protobuf wire messages for TRON transactions.
//!
//! These mirror the node's `protocol` package. Only the fields needed to
//! build, hash and sign transfers are modelled; tag numbers match the node
//! schema so that the encoding (and therefore the transaction id) is the one
//! the node computes.

use prost::Message;

/// Prefix of every `Any.type_url` the node accepts.
pub const TYPE_URL_PREFIX: &str = "type.googleapis.com/protocol.";

/// `google.protobuf.Any`.
#[derive(Clone, PartialEq, Message)]
pub struct Any {
    #[prost(string, tag = "1")]
    pub type_url: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

impl Any {
    /// Wrap an encoded message under `type.googleapis.com/protocol.<name>`.
    pub fn pack<M: Message>(name: &str, message: &M) -> Self {
        Self {
            type_url: format!("{}{}", TYPE_URL_PREFIX, name),
            value: message.encode_to_vec(),
        }
    }

    /// Short type name (the part after the last `.`).
    pub fn type_name(&self) -> &str {
        self.type_url.rsplit('.').next().unwrap_or_default()
    }
}

/// Contract kinds, numbered as in the node schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ContractType {
    AccountCreateContract = 0,
    TransferContract = 1,
    TransferAssetContract = 2,
    VoteWitnessContract = 4,
    WitnessCreateContract = 5,
    AssetIssueContract = 6,
    FreezeBalanceContract = 11,
    UnfreezeBalanceContract = 12,
    CreateSmartContract = 30,
    TriggerSmartContract = 31,
    FreezeBalanceV2Contract = 54,
    UnfreezeBalanceV2Contract = 55,
}

/// `Transaction.Contract`: one operation inside a transaction.
#[derive(Clone, PartialEq, Message)]
pub struct Contract {
    #[prost(enumeration = "ContractType", tag = "1")]
    pub r#type: i32,
    #[prost(message, optional, tag = "2")]
    pub parameter: Option<Any>,
    #[prost(bytes = "vec", tag = "3")]
    pub provider: Vec<u8>,
    #[prost(bytes = "vec", tag = "4")]
    pub contract_name: Vec<u8>,
    #[prost(int32, tag = "5")]
    pub permission_id: i32,
}

impl Contract {
    /// Wrap a TRX transfer.
    pub fn transfer(transfer: &TransferContract) -> Self {
        Self {
            r#type: ContractType::TransferContract as i32,
            parameter: Some(Any::pack("TransferContract", transfer)),
            ..Default::default()
        }
    }

    /// Wrap a TRC-10 asset transfer.
    pub fn transfer_asset(transfer: &TransferAssetContract) -> Self {
        Self {
            r#type: ContractType::TransferAssetContract as i32,
            parameter: Some(Any::pack("TransferAssetContract", transfer)),
            ..Default::default()
        }
    }

    /// Decode the parameter as a TRX transfer, if that is what this contract holds.
    pub fn as_transfer(&self) -> Option<TransferContract> {
        if self.r#type() != ContractType::TransferContract {
            return None;
        }
        let parameter = self.parameter.as_ref()?;
        TransferContract::decode(parameter.value.as_slice()).ok()
    }
}

/// `TransferContract`: move TRX between accounts.
#[derive(Clone, PartialEq, Message)]
pub struct TransferContract {
    #[prost(bytes = "vec", tag = "1")]
    pub owner_address: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub to_address: Vec<u8>,
    #[prost(int64, tag = "3")]
    pub amount: i64,
}

/// `TransferAssetContract`: move a TRC-10 token between accounts.
#[derive(Clone, PartialEq, Message)]
pub struct TransferAssetContract {
    #[prost(bytes = "vec", tag = "1")]
    pub asset_name: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub owner_address: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub to_address: Vec<u8>,
    #[prost(int64, tag = "4")]
    pub amount: i64,
}

/// `Transaction.raw`: the signed and hashed portion of a transaction.
#[derive(Clone, PartialEq, Message)]
pub struct TransactionRaw {
    #[prost(bytes = "vec", tag = "1")]
    pub ref_block_bytes: Vec<u8>,
    #[prost(int64, tag = "3")]
    pub ref_block_num: i64,
    #[prost(bytes = "vec", tag = "4")]
    pub ref_block_hash: Vec<u8>,
    #[prost(int64, tag = "8")]
    pub expiration: i64,
    /// Free-form memo.
    #[prost(bytes = "vec", tag = "10")]
    pub data: Vec<u8>,
    #[prost(message, repeated, tag = "11")]
    pub contract: Vec<Contract>,
    #[prost(bytes = "vec", tag = "12")]
    pub scripts: Vec<u8>,
    #[prost(int64, tag = "14")]
    pub timestamp: i64,
    #[prost(int64, tag = "18")]
    pub fee_limit: i64,
}

/// `Transaction`: raw data plus signatures.
#[derive(Clone, PartialEq, Message)]
pub struct SignedTransactionProto {
    #[prost(message, optional, tag = "1")]
    pub raw_data: Option<TransactionRaw>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub signature: Vec<Vec<u8>>,
}
