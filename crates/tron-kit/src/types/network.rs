//! Network identification for TRON.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Public TronGrid endpoint for mainnet.
pub const MAINNET_URL: &str = "https://api.trongrid.io";
/// Public TronGrid endpoint for the Shasta testnet.
pub const SHASTA_URL: &str = "https://api.shasta.trongrid.io";
/// Public TronGrid endpoint for the Nile testnet.
pub const NILE_URL: &str = "https://nile.trongrid.io";

/// The TRON network the client is connected to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// TRON mainnet.
    #[default]
    Mainnet,
    /// Shasta testnet.
    Shasta,
    /// Nile testnet.
    Nile,
    /// A node at a user-supplied URL.
    Custom,
}

impl Network {
    /// Returns true if this is mainnet.
    pub fn is_mainnet(&self) -> bool {
        matches!(self, Network::Mainnet)
    }

    /// Returns true for the public test networks.
    pub fn is_testnet(&self) -> bool {
        matches!(self, Network::Shasta | Network::Nile)
    }

    /// Returns the network identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Shasta => "shasta",
            Network::Nile => "nile",
            Network::Custom => "custom",
        }
    }

    /// Public endpoint for this network, if it has one.
    pub fn default_rpc_url(&self) -> Option<&'static str> {
        match self {
            Network::Mainnet => Some(MAINNET_URL),
            Network::Shasta => Some(SHASTA_URL),
            Network::Nile => Some(NILE_URL),
            Network::Custom => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "shasta" => Ok(Network::Shasta),
            "nile" => Ok(Network::Nile),
            other => Err(Error::Config(format!(
                "Unknown network '{}': expected mainnet, shasta or nile",
                other
            ))),
        }
    }
}
