//! Cryptographic key types for TRON.
//!
//! TRON accounts are secp256k1 key pairs. Transactions are signed over the
//! SHA-256 of their raw data with a recoverable ECDSA signature, so the node
//! can derive the signer's public key (and thus its address) from the
//! signature alone.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{
    RecoveryId, Signature as EcdsaSignature, SigningKey as EcdsaSigningKey, VerifyingKey,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ParseKeyError, SignerError};

use super::{Address, TxHash};

/// Length of a secret key in bytes.
pub const SECRET_KEY_LEN: usize = 32;
/// Length of an uncompressed SEC1 public key in bytes.
pub const PUBLIC_KEY_LEN: usize = 65;
/// Length of a recoverable signature in bytes (`r ‖ s ‖ v`).
pub const SIGNATURE_LEN: usize = 65;

fn decode_hex(s: &str) -> Result<Vec<u8>, ParseKeyError> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).map_err(|e| ParseKeyError::InvalidHex(e.to_string()))
}

// ============================================================================
// PublicKey
// ============================================================================

/// Secp256k1 public key in uncompressed SEC1 form (`0x04 ‖ X ‖ Y`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let mut bytes = [0u8; PUBLIC_KEY_LEN];
        bytes.copy_from_slice(point.as_bytes());
        Self(bytes)
    }

    /// Parse from SEC1 bytes (compressed or uncompressed), validating the curve point.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        let key =
            VerifyingKey::from_sec1_bytes(bytes).map_err(|_| ParseKeyError::InvalidCurvePoint)?;
        Ok(Self::from_verifying_key(&key))
    }

    /// Get the raw 65 bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// The address owned by this key.
    pub fn address(&self) -> Address {
        Address::from_public_key(self)
    }

    fn verifying_key(&self) -> Option<VerifyingKey> {
        VerifyingKey::from_sec1_bytes(&self.0).ok()
    }
}

impl FromStr for PublicKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data = decode_hex(s)?;
        if data.len() != PUBLIC_KEY_LEN && data.len() != 33 {
            return Err(ParseKeyError::InvalidLength {
                expected: PUBLIC_KEY_LEN,
                actual: data.len(),
            });
        }
        Self::from_sec1_bytes(&data)
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

// ============================================================================
// SecretKey
// ============================================================================

/// Secp256k1 secret key.
///
/// Parsed from 64 hex digits (an optional `0x` prefix is accepted), the
/// format exported by TRON wallets.
///
/// ```
/// use tron_kit::SecretKey;
///
/// let key: SecretKey = "68596c63d7230acc0916245c0b419978c831051d83ea46f3611a23d91a0c2b34"
///     .parse()
///     .unwrap();
/// assert_eq!(key.address().to_string(), "TRZar2KkBCxJw3kPHScNUf11bHPV7gj67r");
/// ```
#[derive(Clone)]
pub struct SecretKey {
    inner: EcdsaSigningKey,
}

impl SecretKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        Self {
            inner: EcdsaSigningKey::random(&mut OsRng),
        }
    }

    /// Create from raw 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        if bytes.len() != SECRET_KEY_LEN {
            return Err(ParseKeyError::InvalidLength {
                expected: SECRET_KEY_LEN,
                actual: bytes.len(),
            });
        }
        let inner = EcdsaSigningKey::from_slice(bytes).map_err(|_| ParseKeyError::InvalidScalar)?;
        Ok(Self { inner })
    }

    /// Get the raw 32 bytes.
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_LEN] {
        self.inner.to_bytes().into()
    }

    /// Derive the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(self.inner.verifying_key())
    }

    /// Derive the address this key controls.
    pub fn address(&self) -> Address {
        self.public_key().address()
    }

    /// Sign a 32-byte digest, producing a recoverable signature.
    ///
    /// The digest is signed as-is; it is not hashed again.
    pub fn sign_prehash(&self, digest: &TxHash) -> Result<Signature, SignerError> {
        let (signature, recovery_id) = self
            .inner
            .sign_prehash_recoverable(digest.as_bytes())
            .map_err(|e| SignerError::SigningFailed(e.to_string()))?;

        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes[..64].copy_from_slice(&signature.to_bytes());
        bytes[64] = recovery_id.to_byte();
        Ok(Signature(bytes))
    }
}

impl FromStr for SecretKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(&decode_hex(s)?)
    }
}

impl TryFrom<&str> for SecretKey {
    type Error = ParseKeyError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

// ============================================================================
// Signature
// ============================================================================

/// Recoverable ECDSA signature: `r ‖ s ‖ v`, with `v` the recovery id (0 or 1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    /// Create from raw 65 bytes.
    ///
    /// A trailing `v` of 27/28 (the legacy Ethereum convention) is normalized to 0/1.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        let mut arr: [u8; SIGNATURE_LEN] =
            bytes.try_into().map_err(|_| ParseKeyError::InvalidLength {
                expected: SIGNATURE_LEN,
                actual: bytes.len(),
            })?;
        if arr[64] >= 27 {
            arr[64] -= 27;
        }
        if arr[64] > 1 {
            return Err(ParseKeyError::InvalidSignature(format!(
                "invalid recovery id {}",
                arr[64]
            )));
        }
        EcdsaSignature::from_slice(&arr[..64])
            .map_err(|e| ParseKeyError::InvalidSignature(e.to_string()))?;
        Ok(Self(arr))
    }

    /// Get the raw 65 bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Convert to a Vec<u8>.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// The recovery id (`v`).
    pub fn recovery_id(&self) -> u8 {
        self.0[64]
    }

    fn parts(&self) -> Option<(EcdsaSignature, RecoveryId)> {
        let signature = EcdsaSignature::from_slice(&self.0[..64]).ok()?;
        let recovery_id = RecoveryId::from_byte(self.0[64])?;
        Some((signature, recovery_id))
    }

    /// Recover the public key that produced this signature over `digest`.
    pub fn recover(&self, digest: &TxHash) -> Option<PublicKey> {
        let (signature, recovery_id) = self.parts()?;
        let key =
            VerifyingKey::recover_from_prehash(digest.as_bytes(), &signature, recovery_id).ok()?;
        Some(PublicKey::from_verifying_key(&key))
    }

    /// Verify this signature over `digest` against a public key.
    pub fn verify(&self, digest: &TxHash, public_key: &PublicKey) -> bool {
        let Some((signature, _)) = self.parts() else {
            return false;
        };
        let Some(key) = public_key.verifying_key() else {
            return false;
        };
        key.verify_prehash(digest.as_bytes(), &signature).is_ok()
    }
}

impl FromStr for Signature {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(&decode_hex(s)?)
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
