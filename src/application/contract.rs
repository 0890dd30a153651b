//! # Contract Binding
//!
//! A deployed contract bound to its interface and to a client.
//!
//! Reads are simulated from the zero address against a block of the
//! caller's choosing (latest by default). Writes go through the client's
//! [`TransactionBuilder`](super::transaction_builder::TransactionBuilder).

use super::abi::ContractInterface;
use super::client::Web3Client;
use super::error::ClientResult;
use crate::domain::account::canonical_address;
use crate::domain::transaction::SendTxParams;
use crate::infrastructure::blockchain::{BlockTag, CallRequest, TxHash};
use ethers::abi::Token;
use ethers::types::{Address, Bytes, U256};
use tracing::debug;

/// Contract interface bound to an address.
#[derive(Debug, Clone)]
pub struct ContractBinding<'a> {
    client: &'a Web3Client,
    interface: ContractInterface,
    address: Address,
}

impl<'a> ContractBinding<'a> {
    pub(crate) fn new(client: &'a Web3Client, interface: ContractInterface, address: Address) -> Self {
        Self {
            client,
            interface,
            address,
        }
    }

    /// Returns the contract address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Returns the bound interface.
    #[must_use]
    pub fn interface(&self) -> &ContractInterface {
        &self.interface
    }

    /// Calls a function against the latest block and returns the raw
    /// return data.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnknownFunction` or `ClientError::ArgumentEncoding`
    /// before any network call, or `ClientError::Rpc` if the node call fails.
    pub async fn call(&self, function: &str, args: &[Token]) -> ClientResult<Bytes> {
        self.history_call(BlockTag::Latest, function, args).await
    }

    /// Calls a function against a specific block.
    ///
    /// # Errors
    ///
    /// Same as [`Self::call`].
    pub async fn history_call(
        &self,
        block: BlockTag,
        function: &str,
        args: &[Token],
    ) -> ClientResult<Bytes> {
        let data = self.interface.encode_call(function, args)?;
        let request = CallRequest::from_zero_address(self.address, data);
        debug!(
            contract = %canonical_address(&self.address),
            function,
            %block,
            "contract call"
        );
        Ok(self.client.gateway().call(&request, block).await?)
    }

    /// Calls a function against the latest block and decodes the result.
    ///
    /// # Errors
    ///
    /// Same as [`Self::call`], plus `ClientError::Decoding` when the return
    /// data does not match the declared outputs.
    pub async fn call_decoded(&self, function: &str, args: &[Token]) -> ClientResult<Vec<Token>> {
        let data = self.call(function, args).await?;
        self.interface.decode_output(function, &data)
    }

    /// Sends a state-changing call.
    ///
    /// The sender is resolved first; arguments are only encoded once it is
    /// known to be registered.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotRegistered`, `UnknownFunction`, `ArgumentEncoding`,
    /// `SigningFailed` or `BroadcastFailed`, from the stage that failed.
    pub async fn send(
        &self,
        params: &SendTxParams,
        value: U256,
        function: &str,
        args: &[Token],
    ) -> ClientResult<TxHash> {
        self.client
            .transaction_builder()
            .send(params, self.address, value, || {
                self.interface.encode_input(function, args)
            })
            .await
    }
}
