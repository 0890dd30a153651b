//! # Domain Errors
//!
//! Typed error definitions for domain value construction.
//!
//! Error codes are organized by category:
//! - 1000-1999: Key and address format errors
//! - 2000-2999: Network selection errors
//!
//! # Examples
//!
//! ```
//! use web3_client::domain::errors::DomainError;
//!
//! let error = DomainError::InvalidKeyFormat("odd length".to_string());
//! assert_eq!(error.code(), 1001);
//! ```

use thiserror::Error;

/// Domain-level error with numeric error codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // ========================================================================
    // Format Errors (1000-1999)
    // ========================================================================
    /// Private key could not be parsed.
    #[error("invalid private key: {0}")]
    InvalidKeyFormat(String),

    /// Address could not be parsed into canonical form.
    #[error("invalid address: {0}")]
    InvalidAddressFormat(String),

    // ========================================================================
    // Network Errors (2000-2999)
    // ========================================================================
    /// Network selector names an unsupported network.
    #[error("{0} network not supported")]
    UnsupportedNetwork(String),

    /// Network selector is not set.
    #[error("network selector {0} is not set")]
    MissingNetworkSelector(String),
}

impl DomainError {
    /// Returns the numeric error code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::InvalidKeyFormat(_) => 1001,
            Self::InvalidAddressFormat(_) => 1002,
            Self::UnsupportedNetwork(_) => 2001,
            Self::MissingNetworkSelector(_) => 2002,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
