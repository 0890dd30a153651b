//! # RPC Gateway Port
//!
//! Port definition for the JSON-RPC node.
//!
//! This module defines the [`RpcGateway`] trait that abstracts the five
//! remote operations the client consumes: balance lookup, nonce lookup,
//! read-only call, raw transaction submission, and receipt lookup.

use async_trait::async_trait;
use ethers::types::{Address, BlockId, BlockNumber, Bytes, H256, U256, U64};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Block identifier used to pin reads to a point in chain history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    /// Latest mined block.
    #[default]
    Latest,
    /// Genesis block.
    Earliest,
    /// Pending state.
    Pending,
    /// Specific block number.
    Number(u64),
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Earliest => write!(f, "earliest"),
            Self::Pending => write!(f, "pending"),
            Self::Number(n) => write!(f, "{n:#x}"),
        }
    }
}

impl FromStr for BlockTag {
    type Err = BlockchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "latest" => Ok(Self::Latest),
            "earliest" => Ok(Self::Earliest),
            "pending" => Ok(Self::Pending),
            other => {
                let parsed = match other.strip_prefix("0x") {
                    Some(hex) => u64::from_str_radix(hex, 16),
                    None => other.parse(),
                };
                parsed
                    .map(Self::Number)
                    .map_err(|_| BlockchainError::invalid_input(format!("invalid block tag: {s}")))
            }
        }
    }
}

impl From<BlockTag> for BlockId {
    fn from(tag: BlockTag) -> Self {
        let number = match tag {
            BlockTag::Latest => BlockNumber::Latest,
            BlockTag::Earliest => BlockNumber::Earliest,
            BlockTag::Pending => BlockNumber::Pending,
            BlockTag::Number(n) => BlockNumber::Number(U64::from(n)),
        };
        BlockId::Number(number)
    }
}

/// Read-only call request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    /// Sender used for simulation.
    pub from: Address,
    /// Contract being called.
    pub to: Address,
    /// Encoded call data.
    pub data: Bytes,
}

impl CallRequest {
    /// Creates a call request simulated from the zero address.
    #[must_use]
    pub fn from_zero_address(to: Address, data: Bytes) -> Self {
        Self {
            from: Address::zero(),
            to,
            data,
        }
    }
}

/// Transaction hash (0x-prefixed, lowercase hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    /// Creates a new transaction hash.
    #[must_use]
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Returns the hash as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the hash into its 32-byte form.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash is not 32 bytes of hex.
    pub fn to_h256(&self) -> BlockchainResult<H256> {
        self.0
            .parse()
            .map_err(|_| {
                BlockchainError::invalid_input(format!("invalid transaction hash: {}", self.0))
            })
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TxHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<H256> for TxHash {
    fn from(hash: H256) -> Self {
        Self(format!("{hash:#x}"))
    }
}

/// Log entry emitted by a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLog {
    /// Emitting contract.
    pub address: Address,
    /// Indexed topics.
    pub topics: Vec<H256>,
    /// Non-indexed data.
    pub data: Bytes,
}

/// Transaction receipt with outcome details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash.
    pub tx_hash: TxHash,
    /// Block number where the transaction was included.
    pub block_number: Option<u64>,
    /// Gas used by the transaction.
    pub gas_used: Option<U256>,
    /// Whether the transaction succeeded.
    pub success: bool,
    /// Emitted logs.
    pub logs: Vec<ReceiptLog>,
}

/// Error type for node and transport operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Transport-level failure.
    #[error("connection error: {0}")]
    Connection(String),

    /// The node answered with a JSON-RPC error.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Reason reported by the node.
        message: String,
    },

    /// Request timed out.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Response could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Caller-supplied block tag or hash could not be parsed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BlockchainError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a JSON-RPC error.
    #[must_use]
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Creates an invalid response error.
    #[must_use]
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Returns true if the request was rejected before reaching the node.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the node's reason, if the node produced one.
    #[must_use]
    pub fn node_reason(&self) -> Option<&str> {
        match self {
            Self::Rpc { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Result type for node operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Remote operations exposed by an Ethereum-compatible node.
///
/// Each method performs exactly one round trip. Deadlines and cancellation
/// belong to the implementation's transport.
#[async_trait]
pub trait RpcGateway: Send + Sync + fmt::Debug {
    /// Returns the balance of an address in wei.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails.
    async fn balance_of(&self, address: Address, block: BlockTag) -> BlockchainResult<U256>;

    /// Returns the transaction count (nonce) of an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails.
    async fn transaction_count(&self, address: Address, block: BlockTag) -> BlockchainResult<u64>;

    /// Executes a read-only call and returns the raw return data.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails or the call reverts.
    async fn call(&self, request: &CallRequest, block: BlockTag) -> BlockchainResult<Bytes>;

    /// Submits a signed, serialized transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the node rejects the transaction.
    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash>;

    /// Returns the receipt of a mined transaction, or `None` if unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails.
    async fn transaction_receipt(&self, hash: &TxHash) -> BlockchainResult<Option<TxReceipt>>;
}
