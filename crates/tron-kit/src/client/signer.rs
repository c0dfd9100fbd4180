//! Signer trait and implementations.
//!
//! A `Signer` knows which address it signs for and hands out a [`SigningKey`]
//! that bundles the public key with the ability to sign a transaction id.
//!
//! # Implementations
//!
//! - [`InMemorySigner`] - Single key stored in memory
//! - [`EnvSigner`] - Key loaded from an environment variable
//!
//! # Example
//!
//! ```rust,no_run
//! use tron_kit::{InMemorySigner, Tron};
//!
//! # async fn example() -> Result<(), tron_kit::Error> {
//! let signer = InMemorySigner::new(
//!     "68596c63d7230acc0916245c0b419978c831051d83ea46f3611a23d91a0c2b34",
//! )?;
//!
//! let tron = Tron::shasta().signer(signer).build();
//!
//! tron.transfer("TYd8oTYpaE7YJR4sS7HT8tRzAFUG8RqwxD", "1 TRX").await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::{Error, SignerError};
use crate::types::{Address, PublicKey, SecretKey, Signature, Transaction, TxHash};

/// Environment variable read by [`EnvSigner::new`].
pub const PRIVATE_KEY_ENV: &str = "TRON_PRIVATE_KEY";

// ============================================================================
// Signer Trait
// ============================================================================

/// Trait for signing transactions.
///
/// # Example Implementation
///
/// ```rust
/// use tron_kit::{Address, SecretKey, Signer, SigningKey};
///
/// struct MySigner {
///     address: Address,
///     secret_key: SecretKey,
/// }
///
/// impl Signer for MySigner {
///     fn address(&self) -> &Address {
///         &self.address
///     }
///
///     fn key(&self) -> SigningKey {
///         SigningKey::new(self.secret_key.clone())
///     }
/// }
/// ```
pub trait Signer: Send + Sync {
    /// The address this signer signs for.
    fn address(&self) -> &Address;

    /// Get a key for signing.
    fn key(&self) -> SigningKey;
}

impl Signer for Arc<dyn Signer> {
    fn address(&self) -> &Address {
        (**self).address()
    }

    fn key(&self) -> SigningKey {
        (**self).key()
    }
}

// ============================================================================
// SigningKey
// ============================================================================

/// A key that can sign transaction ids.
///
/// For in-memory keys signing completes immediately; other backends
/// (hardware wallets, remote signers) may await user confirmation or I/O.
pub struct SigningKey {
    public_key: PublicKey,
    backend: Arc<dyn SigningBackend>,
}

impl SigningKey {
    /// Create a signing key backed by an in-memory secret key.
    pub fn new(secret_key: SecretKey) -> Self {
        let public_key = secret_key.public_key();
        Self {
            public_key,
            backend: Arc::new(SecretKeyBackend { secret_key }),
        }
    }

    /// Create a signing key backed by a custom backend.
    pub fn with_backend(public_key: PublicKey, backend: Arc<dyn SigningBackend>) -> Self {
        Self {
            public_key,
            backend,
        }
    }

    /// Get the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The address of the public key.
    pub fn address(&self) -> Address {
        self.public_key.address()
    }

    /// Sign a transaction id.
    pub async fn sign(&self, digest: &TxHash) -> Result<Signature, SignerError> {
        self.backend.sign(digest).await
    }

    /// Sign a transaction and append the signature to it.
    pub async fn sign_transaction(&self, tx: &mut Transaction) -> Result<(), SignerError> {
        let signature = self.sign(&tx.hash()).await?;
        tx.add_signature(signature);
        Ok(())
    }
}

impl Clone for SigningKey {
    fn clone(&self) -> Self {
        Self {
            public_key: self.public_key,
            backend: self.backend.clone(),
        }
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("public_key", &self.public_key)
            .finish()
    }
}

// ============================================================================
// SigningBackend
// ============================================================================

/// Something that can produce a recoverable secp256k1 signature over a digest.
pub trait SigningBackend: Send + Sync {
    fn sign(&self, digest: &TxHash) -> BoxFuture<'_, Result<Signature, SignerError>>;
}

struct SecretKeyBackend {
    secret_key: SecretKey,
}

impl SigningBackend for SecretKeyBackend {
    fn sign(&self, digest: &TxHash) -> BoxFuture<'_, Result<Signature, SignerError>> {
        let result = self.secret_key.sign_prehash(digest);
        Box::pin(async move { result })
    }
}

// ============================================================================
// InMemorySigner
// ============================================================================

/// A signer with a single key stored in memory.
///
/// ```rust
/// use tron_kit::{InMemorySigner, Signer};
///
/// let signer = InMemorySigner::new(
///     "68596c63d7230acc0916245c0b419978c831051d83ea46f3611a23d91a0c2b34",
/// )
/// .unwrap();
/// assert_eq!(signer.address().to_string(), "TRZar2KkBCxJw3kPHScNUf11bHPV7gj67r");
/// ```
#[derive(Clone)]
pub struct InMemorySigner {
    address: Address,
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl InMemorySigner {
    /// Create a signer from a hex-encoded private key.
    pub fn new(secret_key: impl AsRef<str>) -> Result<Self, Error> {
        let secret_key: SecretKey = secret_key.as_ref().parse()?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Create a signer from a SecretKey directly.
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = secret_key.public_key();
        Self {
            address: public_key.address(),
            secret_key,
            public_key,
        }
    }

    /// Get the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

impl std::fmt::Debug for InMemorySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySigner")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl Signer for InMemorySigner {
    fn address(&self) -> &Address {
        &self.address
    }

    fn key(&self) -> SigningKey {
        SigningKey::new(self.secret_key.clone())
    }
}

// ============================================================================
// EnvSigner
// ============================================================================

/// A signer that loads its private key from an environment variable.
///
/// ```rust,no_run
/// use tron_kit::EnvSigner;
///
/// // With TRON_PRIVATE_KEY set:
/// let signer = EnvSigner::new().unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct EnvSigner {
    inner: InMemorySigner,
}

impl EnvSigner {
    /// Load from `TRON_PRIVATE_KEY`.
    pub fn new() -> Result<Self, Error> {
        Self::from_env_var(PRIVATE_KEY_ENV)
    }

    /// Load from a custom environment variable.
    pub fn from_env_var(key_var: &str) -> Result<Self, Error> {
        let private_key = std::env::var(key_var)
            .map_err(|_| Error::Config(format!("Environment variable {} not set", key_var)))?;
        let inner = InMemorySigner::new(private_key.trim())?;
        Ok(Self { inner })
    }

    /// Get the public key.
    pub fn public_key(&self) -> &PublicKey {
        self.inner.public_key()
    }
}

impl Signer for EnvSigner {
    fn address(&self) -> &Address {
        self.inner.address()
    }

    fn key(&self) -> SigningKey {
        self.inner.key()
    }
}
