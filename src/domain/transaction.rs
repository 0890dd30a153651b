//! # Transactions
//!
//! Value types for the write path.
//!
//! - [`SendTxParams`]: caller-managed sender, nonce and gas settings
//! - [`TransactionIntent`]: the canonical unsigned transaction
//! - [`SignedTransaction`]: serialized signed bytes, consumed by broadcast
//! - [`SendState`]: stages of a single send
//!
//! Nonce and gas values are always supplied by the caller; nothing here
//! estimates gas or fetches nonces.

use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, H256, TransactionRequest, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-supplied parameters for a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTxParams {
    /// Registered sender address (any case).
    pub from_address: String,
    /// Gas limit.
    pub gas_limit: U256,
    /// Gas price in wei.
    pub gas_price: U256,
    /// Sender nonce.
    pub nonce: u64,
}

impl SendTxParams {
    /// Creates send parameters.
    #[must_use]
    pub fn new(
        from_address: impl Into<String>,
        gas_limit: impl Into<U256>,
        gas_price: impl Into<U256>,
        nonce: u64,
    ) -> Self {
        Self {
            from_address: from_address.into(),
            gas_limit: gas_limit.into(),
            gas_price: gas_price.into(),
            nonce,
        }
    }
}

/// Unsigned transaction, constructed fresh for each send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionIntent {
    from: Address,
    to: Address,
    value: U256,
    gas_limit: U256,
    gas_price: U256,
    nonce: u64,
    data: Bytes,
}

impl TransactionIntent {
    /// Assembles an intent from caller parameters.
    #[must_use]
    pub fn new(from: Address, to: Address, value: U256, params: &SendTxParams, data: Bytes) -> Self {
        Self {
            from,
            to,
            value,
            gas_limit: params.gas_limit,
            gas_price: params.gas_price,
            nonce: params.nonce,
            data,
        }
    }

    /// Returns the sender.
    #[must_use]
    pub fn sender(&self) -> Address {
        self.from
    }

    /// Returns the recipient.
    #[must_use]
    pub fn to(&self) -> Address {
        self.to
    }

    /// Returns the value in wei.
    #[must_use]
    pub fn value(&self) -> U256 {
        self.value
    }

    /// Returns the gas limit.
    #[must_use]
    pub fn gas_limit(&self) -> U256 {
        self.gas_limit
    }

    /// Returns the gas price in wei.
    #[must_use]
    pub fn gas_price(&self) -> U256 {
        self.gas_price
    }

    /// Returns the nonce.
    #[must_use]
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Returns the call data.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Builds the legacy (EIP-155) transaction for the given chain.
    #[must_use]
    pub fn to_typed(&self, chain_id: u64) -> TypedTransaction {
        TransactionRequest::new()
            .from(self.from)
            .to(self.to)
            .value(self.value)
            .gas(self.gas_limit)
            .gas_price(self.gas_price)
            .nonce(self.nonce)
            .data(self.data.clone())
            .chain_id(chain_id)
            .into()
    }
}

/// A signed, serialized transaction.
///
/// Not `Clone`: broadcasting consumes it, so one signing yields at most one
/// submission.
#[derive(Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    raw: Bytes,
    hash: H256,
    from: Address,
    chain_id: u64,
}

impl SignedTransaction {
    /// Wraps signed bytes.
    #[must_use]
    pub fn new(raw: Bytes, hash: H256, from: Address, chain_id: u64) -> Self {
        Self {
            raw,
            hash,
            from,
            chain_id,
        }
    }

    /// Returns the serialized bytes.
    #[must_use]
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Returns the transaction hash (keccak of the serialized bytes).
    #[must_use]
    pub fn hash(&self) -> H256 {
        self.hash
    }

    /// Returns the signer address.
    #[must_use]
    pub fn signer(&self) -> Address {
        self.from
    }

    /// Returns the chain id the signature commits to.
    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Consumes the transaction, returning the bytes to broadcast.
    #[must_use]
    pub fn into_raw(self) -> Bytes {
        self.raw
    }
}

/// Stage of a single send.
///
/// `Validating → Encoding → Signing → Broadcasting → Completed`, with any
/// stage able to end in `Failed`. There are no retries between stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendState {
    /// Resolving the sender account.
    Validating,
    /// Encoding call data.
    Encoding,
    /// Signing the intent.
    Signing,
    /// Submitting to the node.
    Broadcasting,
    /// Node accepted the transaction.
    Completed,
    /// A stage failed.
    Failed,
}

impl SendState {
    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns the state following a successful stage.
    #[must_use]
    pub const fn advance(&self) -> Self {
        match self {
            Self::Validating => Self::Encoding,
            Self::Encoding => Self::Signing,
            Self::Signing => Self::Broadcasting,
            Self::Broadcasting | Self::Completed => Self::Completed,
            Self::Failed => Self::Failed,
        }
    }
}

impl fmt::Display for SendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Encoding => "encoding",
            Self::Signing => "signing",
            Self::Broadcasting => "broadcasting",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{name}")
    }
}
