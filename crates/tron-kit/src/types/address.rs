//! TRON account addresses.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};

use crate::error::ParseAddressError;

use super::PublicKey;

/// Prefix byte of every mainnet/testnet TRON address.
pub const ADDRESS_PREFIX: u8 = 0x41;

/// Length of a raw address in bytes (prefix + 20-byte account id).
pub const ADDRESS_LEN: usize = 21;

/// A TRON account address.
///
/// Stored as 21 raw bytes: the `0x41` prefix followed by the last 20 bytes
/// of the Keccak-256 hash of the account's uncompressed public key.
///
/// Two textual forms are accepted when parsing:
///
/// - Base58Check, e.g. `"TRZar2KkBCxJw3kPHScNUf11bHPV7gj67r"` (used by
///   wallets and explorers, and by [`Display`])
/// - hex, e.g. `"41ab0a439b8bf6386546d79e67f14006df7a73047b"` (used on the
///   wire by the node's HTTP API)
///
/// ```
/// use tron_kit::Address;
///
/// let a: Address = "TRZar2KkBCxJw3kPHScNUf11bHPV7gj67r".parse().unwrap();
/// let b: Address = "41ab0a439b8bf6386546d79e67f14006df7a73047b".parse().unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Create from raw bytes, checking the prefix.
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Result<Self, ParseAddressError> {
        if bytes[0] != ADDRESS_PREFIX {
            return Err(ParseAddressError::InvalidPrefix(bytes[0]));
        }
        Ok(Self(bytes))
    }

    /// Derive the address owned by a public key.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        // Skip the 0x04 SEC1 tag; the hash covers only the X and Y coordinates.
        let digest = Keccak256::digest(&public_key.as_bytes()[1..]);
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[0] = ADDRESS_PREFIX;
        bytes[1..].copy_from_slice(&digest[12..]);
        Self(bytes)
    }

    /// Get the raw 21 bytes.
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Convert to a Vec<u8>.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Hex form (`41...`), as used by the node API.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Base58Check form (`T...`).
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).with_check().into_string()
    }

    fn parse_hex(s: &str) -> Result<Self, ParseAddressError> {
        let bytes = hex::decode(s).map_err(|_| ParseAddressError::InvalidHex(s.to_string()))?;
        Self::try_from(bytes.as_slice())
    }

    fn parse_base58(s: &str) -> Result<Self, ParseAddressError> {
        let bytes = bs58::decode(s)
            .with_check(None)
            .into_vec()
            .map_err(|e| match e {
                bs58::decode::Error::InvalidChecksum { .. } => {
                    ParseAddressError::InvalidChecksum(s.to_string())
                }
                _ => ParseAddressError::InvalidBase58(s.to_string()),
            })?;
        Self::try_from(bytes.as_slice())
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseAddressError::Empty);
        }

        // 21 bytes in hex is 42 characters; base58check addresses are 34.
        if s.len() == ADDRESS_LEN * 2 && s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Self::parse_hex(s);
        }
        if let Some(rest) = s.strip_prefix("0x") {
            return Self::parse_hex(rest);
        }
        Self::parse_base58(s)
    }
}

impl TryFrom<&str> for Address {
    type Error = ParseAddressError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = ParseAddressError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| ParseAddressError::InvalidLength(bytes.len()))?;
        Self::from_bytes(arr)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

/// Serialized in hex, the form the node expects when `visible` is unset.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Trait for types that can be turned into an [`Address`].
///
/// Lets builders accept `"T..."` strings as well as typed addresses.
pub trait IntoAddress {
    /// Convert into an address.
    fn into_address(self) -> Result<Address, ParseAddressError>;
}

impl IntoAddress for Address {
    fn into_address(self) -> Result<Address, ParseAddressError> {
        Ok(self)
    }
}

impl IntoAddress for &Address {
    fn into_address(self) -> Result<Address, ParseAddressError> {
        Ok(*self)
    }
}

impl IntoAddress for &str {
    fn into_address(self) -> Result<Address, ParseAddressError> {
        self.parse()
    }
}

impl IntoAddress for String {
    fn into_address(self) -> Result<Address, ParseAddressError> {
        self.parse()
    }
}

impl IntoAddress for &String {
    fn into_address(self) -> Result<Address, ParseAddressError> {
        self.parse()
    }
}
