//! # Chain Configuration
//!
//! Selection of the network whose chain id every signature in the process
//! is bound to (EIP-155 replay protection).
//!
//! The selector is read from the `NETWORK` environment variable once, when a
//! client is constructed. The resulting [`ChainConfig`] is passed by reference
//! to everything that signs.

use super::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::error;

/// Environment variable holding the network selector.
pub const NETWORK_ENV_VAR: &str = "NETWORK";

/// Supported networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Ethereum mainnet (chain ID 1).
    Mainnet,
    /// Kovan test network (chain ID 42).
    Kovan,
}

impl Network {
    /// Returns the numeric chain ID.
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        match self {
            Self::Mainnet => 1,
            Self::Kovan => 42,
        }
    }

    /// Returns the selector name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Kovan => "kovan",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Network {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Self::Mainnet),
            "kovan" => Ok(Self::Kovan),
            other => Err(DomainError::UnsupportedNetwork(other.to_string())),
        }
    }
}

/// Process-wide chain selection, immutable once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    network: Network,
}

impl ChainConfig {
    /// Creates a configuration for a known network.
    #[must_use]
    pub const fn new(network: Network) -> Self {
        Self { network }
    }

    /// Resolves a configuration from a selector value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingNetworkSelector` when `selector` is `None`
    /// and `DomainError::UnsupportedNetwork` for unknown names.
    pub fn from_selector(selector: Option<&str>) -> DomainResult<Self> {
        let selector =
            selector.ok_or_else(|| DomainError::MissingNetworkSelector(NETWORK_ENV_VAR.into()))?;
        selector.parse().map(Self::new)
    }

    /// Resolves a configuration from the `NETWORK` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset, not unicode, or names an
    /// unsupported network.
    pub fn from_env() -> DomainResult<Self> {
        let selector = std::env::var(NETWORK_ENV_VAR).ok();
        Self::from_selector(selector.as_deref())
    }

    /// Resolves a configuration from the environment, terminating the
    /// process when it cannot.
    ///
    /// Signing under an undefined chain id could produce transactions valid
    /// on an unintended network, so this misconfiguration is not recoverable.
    #[must_use]
    pub fn resolve_or_exit() -> Self {
        match Self::from_env() {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, code = e.code(), "cannot resolve chain id");
                std::process::exit(1);
            }
        }
    }

    /// Returns the selected network.
    #[inline]
    #[must_use]
    pub const fn network(&self) -> Network {
        self.network
    }

    /// Returns the numeric chain ID used for signing.
    #[inline]
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        self.network.chain_id()
    }
}

impl fmt::Display for ChainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (chain id {})", self.network, self.chain_id())
    }
}
