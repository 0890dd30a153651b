//! # Recording Gateway
//!
//! In-memory implementation of [`RpcGateway`] for testing.
//!
//! Every request is recorded in order, so tests can assert exactly which
//! remote operations a client performed. Responses are canned and can be
//! configured per address or per call.

use super::client::{
    BlockTag, BlockchainError, BlockchainResult, CallRequest, RpcGateway, TxHash, TxReceipt,
};
use async_trait::async_trait;
use ethers::types::{Address, Bytes, U256};
use ethers::utils::keccak256;
use parking_lot::Mutex;
use std::collections::HashMap;

/// A request observed by [`RecordingGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    /// `balance_of` request.
    Balance {
        /// Queried address.
        address: Address,
        /// Block tag.
        block: BlockTag,
    },
    /// `transaction_count` request.
    TransactionCount {
        /// Queried address.
        address: Address,
        /// Block tag.
        block: BlockTag,
    },
    /// Read-only `call` request.
    Call {
        /// Call request.
        request: CallRequest,
        /// Block tag.
        block: BlockTag,
    },
    /// Raw transaction submission.
    SendRawTransaction {
        /// Serialized signed transaction.
        raw: Bytes,
    },
    /// Receipt lookup.
    Receipt {
        /// Transaction hash.
        hash: TxHash,
    },
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<RecordedCall>,
    balances: HashMap<Address, U256>,
    nonces: HashMap<Address, u64>,
    call_response: Bytes,
    broadcast_rejection: Option<(i64, String)>,
    receipts: HashMap<TxHash, TxReceipt>,
}

/// In-memory [`RpcGateway`] that records requests and serves canned responses.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    state: Mutex<State>,
}

impl RecordingGateway {
    /// Creates an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the balance reported for an address.
    #[must_use]
    pub fn with_balance(self, address: Address, balance: U256) -> Self {
        self.state.lock().balances.insert(address, balance);
        self
    }

    /// Sets the nonce reported for an address.
    #[must_use]
    pub fn with_nonce(self, address: Address, nonce: u64) -> Self {
        self.state.lock().nonces.insert(address, nonce);
        self
    }

    /// Sets the data returned by every read-only call.
    #[must_use]
    pub fn with_call_response(self, data: impl Into<Bytes>) -> Self {
        self.state.lock().call_response = data.into();
        self
    }

    /// Makes every broadcast fail with the given node error.
    #[must_use]
    pub fn rejecting_broadcasts(self, code: i64, reason: impl Into<String>) -> Self {
        self.state.lock().broadcast_rejection = Some((code, reason.into()));
        self
    }

    /// Registers a receipt to be returned by `transaction_receipt`.
    #[must_use]
    pub fn with_receipt(self, receipt: TxReceipt) -> Self {
        self.state
            .lock()
            .receipts
            .insert(receipt.tx_hash.clone(), receipt);
        self
    }

    /// Returns every recorded request, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// Returns the number of recorded requests.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Returns the serialized transactions submitted so far.
    #[must_use]
    pub fn raw_transactions(&self) -> Vec<Bytes> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                RecordedCall::SendRawTransaction { raw } => Some(raw.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RecordedCall) {
        self.state.lock().calls.push(call);
    }
}

#[async_trait]
impl RpcGateway for RecordingGateway {
    async fn balance_of(&self, address: Address, block: BlockTag) -> BlockchainResult<U256> {
        self.record(RecordedCall::Balance { address, block });
        Ok(self
            .state
            .lock()
            .balances
            .get(&address)
            .copied()
            .unwrap_or_default())
    }

    async fn transaction_count(&self, address: Address, block: BlockTag) -> BlockchainResult<u64> {
        self.record(RecordedCall::TransactionCount { address, block });
        Ok(self
            .state
            .lock()
            .nonces
            .get(&address)
            .copied()
            .unwrap_or_default())
    }

    async fn call(&self, request: &CallRequest, block: BlockTag) -> BlockchainResult<Bytes> {
        self.record(RecordedCall::Call {
            request: request.clone(),
            block,
        });
        Ok(self.state.lock().call_response.clone())
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        let hash = TxHash::from(ethers::types::H256::from(keccak256(&raw)));
        self.record(RecordedCall::SendRawTransaction { raw });

        match &self.state.lock().broadcast_rejection {
            Some((code, reason)) => Err(BlockchainError::rpc(*code, reason.clone())),
            None => Ok(hash),
        }
    }

    async fn transaction_receipt(&self, hash: &TxHash) -> BlockchainResult<Option<TxReceipt>> {
        self.record(RecordedCall::Receipt { hash: hash.clone() });
        Ok(self.state.lock().receipts.get(hash).cloned())
    }
}
