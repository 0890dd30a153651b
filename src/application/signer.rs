//! # Transaction Signer
//!
//! Turns a [`TransactionIntent`] into a [`SignedTransaction`] under the
//! process chain id.
//!
//! [`LocalSigner`] signs in process with the account's secp256k1 key.
//! Signatures are deterministic (RFC 6979), so identical intents, keys and
//! chain ids produce byte-identical output.

use super::error::{ClientError, ClientResult};
use crate::domain::account::{Account, wallet_from_hex};
use crate::domain::chain::ChainConfig;
use crate::domain::transaction::{SignedTransaction, TransactionIntent};
use ethers::signers::Signer;
use ethers::types::H256;
use ethers::utils::keccak256;
use std::fmt::Debug;

/// Signs transaction intents.
pub trait TransactionSigner: Send + Sync + Debug {
    /// Signs `intent` with `account`'s key for the chain in `chain`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::SigningFailed` if no signature can be produced.
    fn sign(
        &self,
        account: &Account,
        intent: &TransactionIntent,
        chain: &ChainConfig,
    ) -> ClientResult<SignedTransaction>;
}

/// In-process signer backed by ethers' `LocalWallet`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSigner;

impl LocalSigner {
    /// Creates a local signer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TransactionSigner for LocalSigner {
    fn sign(
        &self,
        account: &Account,
        intent: &TransactionIntent,
        chain: &ChainConfig,
    ) -> ClientResult<SignedTransaction> {
        if intent.sender() != account.address() {
            return Err(ClientError::signing_failed(format!(
                "intent sender {:#x} does not match account {}",
                intent.sender(),
                account.address_hex()
            )));
        }

        let chain_id = chain.chain_id();
        let wallet = wallet_from_hex(account.private_key())
            .map_err(|e| ClientError::signing_failed(e.to_string()))?
            .with_chain_id(chain_id);

        let tx = intent.to_typed(chain_id);
        let signature = wallet
            .sign_transaction_sync(&tx)
            .map_err(|e| ClientError::signing_failed(e.to_string()))?;

        let raw = tx.rlp_signed(&signature);
        let hash = H256::from(keccak256(&raw));

        Ok(SignedTransaction::new(raw, hash, wallet.address(), chain_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::chain::Network;
    use crate::domain::transaction::SendTxParams;
    use ethers::types::{Address, Bytes, Transaction, U256};
    use ethers::utils::rlp::Rlp;

    const KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn account() -> Account {
        Account::from_private_key(KEY).unwrap()
    }

    fn intent(from: Address, nonce: u64) -> TransactionIntent {
        let params = SendTxParams::new(format!("{from:#x}"), 21_000u64, 1_000_000_000u64, nonce);
        TransactionIntent::new(
            from,
            Address::repeat_byte(0x22),
            U256::from(1_000),
            &params,
            Bytes::from(vec![0xca, 0xfe]),
        )
    }

    #[test]
    fn signing_is_deterministic() {
        let account = account();
        let chain = ChainConfig::new(Network::Kovan);
        let first = LocalSigner.sign(&account, &intent(account.address(), 0), &chain).unwrap();
        let second = LocalSigner.sign(&account, &intent(account.address(), 0), &chain).unwrap();

        assert_eq!(first.raw(), second.raw());
        assert_eq!(first.hash(), second.hash());
    }

    #[test]
    fn different_nonce_changes_signature() {
        let account = account();
        let chain = ChainConfig::new(Network::Mainnet);
        let a = LocalSigner.sign(&account, &intent(account.address(), 0), &chain).unwrap();
        let b = LocalSigner.sign(&account, &intent(account.address(), 1), &chain).unwrap();
        assert_ne!(a.raw(), b.raw());
    }

    #[test]
    fn signature_commits_to_chain_id_and_sender() {
        let account = account();
        let chain = ChainConfig::new(Network::Kovan);
        let signed = LocalSigner.sign(&account, &intent(account.address(), 3), &chain).unwrap();

        let decoded: Transaction = Rlp::new(signed.raw()).as_val().unwrap();
        assert_eq!(decoded.chain_id, Some(U256::from(42)));
        assert_eq!(decoded.nonce, U256::from(3));
        assert_eq!(decoded.recover_from().unwrap(), account.address());
        assert_eq!(decoded.hash, signed.hash());
        assert_eq!(signed.signer(), account.address());
        assert_eq!(signed.chain_id(), 42);
    }

    #[test]
    fn chain_id_changes_signature() {
        let account = account();
        let mainnet = LocalSigner
            .sign(&account, &intent(account.address(), 0), &ChainConfig::new(Network::Mainnet))
            .unwrap();
        let kovan = LocalSigner
            .sign(&account, &intent(account.address(), 0), &ChainConfig::new(Network::Kovan))
            .unwrap();
        assert_ne!(mainnet.raw(), kovan.raw());
    }

    #[test]
    fn mismatched_sender_is_rejected() {
        let account = account();
        let err = LocalSigner
            .sign(
                &account,
                &intent(Address::repeat_byte(9), 0),
                &ChainConfig::new(Network::Kovan),
            )
            .unwrap_err();
        assert!(matches!(err, ClientError::SigningFailed(_)));
    }
}
