//! # Transaction Builder
//!
//! The write path shared by contract sends and plain ether transfers.
//!
//! A send runs through `Validating → Encoding → Signing → Broadcasting` and
//! ends in `Completed` or `Failed`. Each stage runs once; a failure ends the
//! send and is returned to the caller. Sender resolution happens before the
//! payload is encoded, so an unregistered sender never causes encoding work
//! or network traffic.

use super::error::{ClientError, ClientResult};
use super::signer::TransactionSigner;
use crate::domain::account::{Account, canonical_address};
use crate::domain::chain::ChainConfig;
use crate::domain::transaction::{SendState, SendTxParams, SignedTransaction, TransactionIntent};
use crate::infrastructure::blockchain::{RpcGateway, TxHash};
use crate::infrastructure::keystore::KeyStore;
use ethers::types::{Address, Bytes, U256};
use tracing::{debug, info};

/// Assembles, signs and broadcasts transactions.
#[derive(Debug, Clone, Copy)]
pub struct TransactionBuilder<'a> {
    keystore: &'a KeyStore,
    gateway: &'a dyn RpcGateway,
    signer: &'a dyn TransactionSigner,
    chain: &'a ChainConfig,
}

impl<'a> TransactionBuilder<'a> {
    /// Creates a builder over the client's collaborators.
    #[must_use]
    pub fn new(
        keystore: &'a KeyStore,
        gateway: &'a dyn RpcGateway,
        signer: &'a dyn TransactionSigner,
        chain: &'a ChainConfig,
    ) -> Self {
        Self {
            keystore,
            gateway,
            signer,
            chain,
        }
    }

    /// Resolves the sender account named by `params`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::AccountNotRegistered` if the address is unknown.
    pub fn resolve_sender(&self, params: &SendTxParams) -> ClientResult<Account> {
        self.keystore
            .account(&params.from_address)
            .ok_or_else(|| ClientError::account_not_registered(&params.from_address))
    }

    /// Signs an intent with the sender's key under the process chain id.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::SigningFailed` if signing fails.
    pub fn sign(
        &self,
        account: &Account,
        intent: &TransactionIntent,
    ) -> ClientResult<SignedTransaction> {
        self.signer.sign(account, intent, self.chain)
    }

    /// Submits a signed transaction exactly once.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::BroadcastFailed` carrying the node's reason.
    pub async fn broadcast(&self, signed: SignedTransaction) -> ClientResult<TxHash> {
        let signer = signed.signer();
        self.gateway
            .send_raw_transaction(signed.into_raw())
            .await
            .map_err(|e| {
                debug!(from = %canonical_address(&signer), error = %e, "broadcast rejected");
                ClientError::broadcast_failed(e)
            })
    }

    /// Runs the full write path.
    ///
    /// `encode` produces the call data and is only invoked once the sender
    /// has been resolved.
    ///
    /// # Errors
    ///
    /// Returns the error of the first stage that fails.
    pub async fn send<F>(
        &self,
        params: &SendTxParams,
        to: Address,
        value: U256,
        encode: F,
    ) -> ClientResult<TxHash>
    where
        F: FnOnce() -> ClientResult<Bytes>,
    {
        let mut state = SendState::Validating;
        debug!(%state, from = %params.from_address, nonce = params.nonce, "send started");

        let result = self.run(&mut state, params, to, value, encode).await;
        match &result {
            Ok(hash) => {
                info!(
                    tx_hash = %hash,
                    from = %params.from_address,
                    to = %canonical_address(&to),
                    nonce = params.nonce,
                    "transaction broadcast"
                );
            }
            Err(e) => {
                debug!(stage = %state, state = %SendState::Failed, error = %e, "send failed");
            }
        }
        result
    }

    async fn run<F>(
        &self,
        state: &mut SendState,
        params: &SendTxParams,
        to: Address,
        value: U256,
        encode: F,
    ) -> ClientResult<TxHash>
    where
        F: FnOnce() -> ClientResult<Bytes>,
    {
        let account = self.resolve_sender(params)?;
        advance(state);

        let data = encode()?;
        let intent = TransactionIntent::new(account.address(), to, value, params, data);
        advance(state);

        let signed = self.sign(&account, &intent)?;
        advance(state);

        let hash = self.broadcast(signed).await?;
        advance(state);
        Ok(hash)
    }
}

fn advance(state: &mut SendState) {
    *state = state.advance();
    debug!(state = %state, "send state");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::signer::LocalSigner;
    use crate::domain::chain::Network;
    use crate::infrastructure::blockchain::{RecordedCall, RecordingGateway};
    use std::cell::Cell;

    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[derive(Debug)]
    struct FailingSigner;

    impl TransactionSigner for FailingSigner {
        fn sign(
            &self,
            _account: &Account,
            _intent: &TransactionIntent,
            _chain: &ChainConfig,
        ) -> ClientResult<SignedTransaction> {
            Err(ClientError::signing_failed("hardware wallet unplugged"))
        }
    }

    struct Fixture {
        keystore: KeyStore,
        gateway: RecordingGateway,
        chain: ChainConfig,
        sender: String,
    }

    impl Fixture {
        fn new(gateway: RecordingGateway) -> Self {
            let keystore = KeyStore::new();
            let sender = keystore.add_account(KEY).unwrap();
            Self {
                keystore,
                gateway,
                chain: ChainConfig::new(Network::Kovan),
                sender,
            }
        }

        fn builder<'a>(&'a self, signer: &'a dyn TransactionSigner) -> TransactionBuilder<'a> {
            TransactionBuilder::new(&self.keystore, &self.gateway, signer, &self.chain)
        }

        fn params(&self) -> SendTxParams {
            SendTxParams::new(&self.sender, 21_000u64, 1_000_000_000u64, 0)
        }
    }

    #[tokio::test]
    async fn unregistered_sender_skips_encoding_and_network() {
        let fixture = Fixture::new(RecordingGateway::new());
        let params = SendTxParams::new("0x0000000000000000000000000000000000000001", 21_000u64, 1u64, 0);
        let encoded = Cell::new(false);

        let err = fixture
            .builder(&LocalSigner)
            .send(&params, Address::zero(), U256::zero(), || {
                encoded.set(true);
                Ok(Bytes::default())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::AccountNotRegistered(_)));
        assert!(!encoded.get());
        assert_eq!(fixture.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn encoding_failure_stops_before_network() {
        let fixture = Fixture::new(RecordingGateway::new());

        let err = fixture
            .builder(&LocalSigner)
            .send(&fixture.params(), Address::zero(), U256::zero(), || {
                Err(ClientError::argument_encoding("transfer", "expected 2 arguments, got 0"))
            })
            .await
            .unwrap_err();

        assert_eq!(err.failed_stage(), Some(SendState::Encoding));
        assert_eq!(fixture.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn signing_failure_aborts_before_broadcast() {
        let fixture = Fixture::new(RecordingGateway::new());

        let err = fixture
            .builder(&FailingSigner)
            .send(&fixture.params(), Address::zero(), U256::zero(), || {
                Ok(Bytes::default())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::SigningFailed(_)));
        assert!(fixture.gateway.raw_transactions().is_empty());
    }

    #[tokio::test]
    async fn broadcast_failure_is_reported_once() {
        let fixture =
            Fixture::new(RecordingGateway::new().rejecting_broadcasts(-32000, "nonce too low"));

        let err = fixture
            .builder(&LocalSigner)
            .send(&fixture.params(), Address::zero(), U256::zero(), || {
                Ok(Bytes::default())
            })
            .await
            .unwrap_err();

        assert_eq!(err.node_reason(), Some("nonce too low"));
        assert_eq!(err.failed_stage(), Some(SendState::Broadcasting));
        assert_eq!(fixture.gateway.raw_transactions().len(), 1);
    }

    #[tokio::test]
    async fn successful_send_returns_hash_of_broadcast_bytes() {
        let fixture = Fixture::new(RecordingGateway::new());
        let builder = fixture.builder(&LocalSigner);

        let hash = builder
            .send(&fixture.params(), Address::repeat_byte(7), U256::from(5), || {
                Ok(Bytes::from(vec![1, 2, 3]))
            })
            .await
            .unwrap();

        let calls = fixture.gateway.calls();
        assert_eq!(calls.len(), 1);
        let RecordedCall::SendRawTransaction { raw } = &calls[0] else {
            unreachable!("only a broadcast is expected");
        };
        assert_eq!(hash, TxHash::from(ethers::types::H256::from(ethers::utils::keccak256(raw))));
    }

    #[test]
    fn resolves_sender_case_insensitively() {
        let fixture = Fixture::new(RecordingGateway::new());
        let params = SendTxParams::new(fixture.sender.to_uppercase().replace("0X", "0x"), 1u64, 1u64, 0);
        let account = fixture.builder(&LocalSigner).resolve_sender(&params).unwrap();
        assert_eq!(account.address_hex(), fixture.sender);
    }
}
