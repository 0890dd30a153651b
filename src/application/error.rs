//! # Client Errors
//!
//! Caller-facing error taxonomy for every public client operation.
//!
//! # Error Hierarchy
//!
//! ```text
//! ClientError
//! ├── caller errors (never retried)
//! │   ├── InvalidKeyFormat
//! │   ├── InvalidAbiDescription
//! │   ├── InvalidAddressFormat
//! │   ├── UnknownFunction
//! │   ├── ArgumentEncoding { function, message }
//! │   └── AccountNotRegistered
//! ├── SigningFailed               - aborts before broadcast
//! ├── BroadcastFailed(BlockchainError)
//! ├── Rpc(BlockchainError)        - read-path transport/node errors,
//! │                                 caller errors when `InvalidInput`
//! ├── Decoding                    - return data does not match outputs
//! └── Configuration               - client could not be assembled
//! ```
//!
//! # Examples
//!
//! ```
//! use web3_client::application::error::ClientError;
//!
//! let err = ClientError::unknown_function("mint");
//! assert!(err.is_caller_error());
//! assert_eq!(err.to_string(), "unknown function: mint");
//! ```

use crate::domain::errors::DomainError;
use crate::domain::transaction::SendState;
use crate::infrastructure::blockchain::BlockchainError;
use thiserror::Error;

/// Error returned by client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Private key could not be parsed.
    #[error("invalid private key: {0}")]
    InvalidKeyFormat(String),

    /// Contract interface description could not be parsed.
    #[error("invalid abi description: {0}")]
    InvalidAbiDescription(String),

    /// Address could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddressFormat(String),

    /// Function is not declared by the bound interface.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Arguments do not match the function signature.
    #[error("cannot encode arguments for {function}: {message}")]
    ArgumentEncoding {
        /// Function name.
        function: String,
        /// What did not match.
        message: String,
    },

    /// Sender address is not in the key store.
    #[error("account not registered: {0}")]
    AccountNotRegistered(String),

    /// Transaction could not be signed.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Node rejected or did not receive the signed transaction.
    #[error("broadcast failed: {0}")]
    BroadcastFailed(BlockchainError),

    /// Return data could not be decoded.
    #[error("decoding failed: {0}")]
    Decoding(String),

    /// Read request failed.
    #[error("rpc failed: {0}")]
    Rpc(#[from] BlockchainError),

    /// Client configuration is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Creates an invalid key error.
    #[must_use]
    pub fn invalid_key_format(message: impl Into<String>) -> Self {
        Self::InvalidKeyFormat(message.into())
    }

    /// Creates an invalid ABI description error.
    #[must_use]
    pub fn invalid_abi_description(message: impl Into<String>) -> Self {
        Self::InvalidAbiDescription(message.into())
    }

    /// Creates an invalid address error.
    #[must_use]
    pub fn invalid_address_format(address: impl Into<String>) -> Self {
        Self::InvalidAddressFormat(address.into())
    }

    /// Creates an unknown function error.
    #[must_use]
    pub fn unknown_function(name: impl Into<String>) -> Self {
        Self::UnknownFunction(name.into())
    }

    /// Creates an argument encoding error.
    #[must_use]
    pub fn argument_encoding(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArgumentEncoding {
            function: function.into(),
            message: message.into(),
        }
    }

    /// Creates an account not registered error.
    #[must_use]
    pub fn account_not_registered(address: impl Into<String>) -> Self {
        Self::AccountNotRegistered(address.into())
    }

    /// Creates a signing failure.
    #[must_use]
    pub fn signing_failed(message: impl Into<String>) -> Self {
        Self::SigningFailed(message.into())
    }

    /// Creates a broadcast failure.
    #[must_use]
    pub fn broadcast_failed(source: BlockchainError) -> Self {
        Self::BroadcastFailed(source)
    }

    /// Creates a decoding error.
    #[must_use]
    pub fn decoding(message: impl Into<String>) -> Self {
        Self::Decoding(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true if the caller supplied bad input.
    ///
    /// Caller errors are never retried and no network I/O was performed for
    /// them.
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidKeyFormat(_)
                | Self::InvalidAbiDescription(_)
                | Self::InvalidAddressFormat(_)
                | Self::UnknownFunction(_)
                | Self::ArgumentEncoding { .. }
                | Self::AccountNotRegistered(_)
                | Self::Rpc(BlockchainError::InvalidInput(_))
        )
    }

    /// Returns the send stage this error aborts, if it belongs to the write
    /// path.
    #[must_use]
    pub fn failed_stage(&self) -> Option<SendState> {
        match self {
            Self::AccountNotRegistered(_) => Some(SendState::Validating),
            Self::UnknownFunction(_) | Self::ArgumentEncoding { .. } => Some(SendState::Encoding),
            Self::SigningFailed(_) => Some(SendState::Signing),
            Self::BroadcastFailed(_) => Some(SendState::Broadcasting),
            _ => None,
        }
    }

    /// Returns the node's reported reason for RPC-level failures.
    #[must_use]
    pub fn node_reason(&self) -> Option<&str> {
        match self {
            Self::BroadcastFailed(e) | Self::Rpc(e) => e.node_reason(),
            _ => None,
        }
    }
}

impl From<DomainError> for ClientError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidKeyFormat(message) => Self::InvalidKeyFormat(message),
            DomainError::InvalidAddressFormat(address) => Self::InvalidAddressFormat(address),
            other @ (DomainError::UnsupportedNetwork(_)
            | DomainError::MissingNetworkSelector(_)) => Self::Configuration(other.to_string()),
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
