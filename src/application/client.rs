//! # Web3 Client
//!
//! Entry point tying the key store, the chain selection, the node gateway
//! and the gas price oracle together.
//!
//! A client is safe to share between tasks and threads: the key store is
//! internally synchronized, and every other collaborator is immutable after
//! construction. Each operation performs at most one round trip to the node
//! and never spawns background work.
//!
//! # Examples
//!
//! ```ignore
//! use web3_client::application::client::Web3Client;
//! use web3_client::domain::transaction::SendTxParams;
//!
//! let client = Web3Client::new("http://localhost:8545")?;
//! let sender = client.add_account(private_key)?;
//! let token = client.new_contract(ERC20_ABI, token_address)?;
//! let hash = token
//!     .send(&SendTxParams::new(&sender, 60_000u64, gas_price, nonce), 0.into(), "transfer", &args)
//!     .await?;
//! ```

use super::abi::ContractInterface;
use super::contract::ContractBinding;
use super::error::{ClientError, ClientResult};
use super::signer::{LocalSigner, TransactionSigner};
use super::transaction_builder::TransactionBuilder;
use crate::config::{ClientConfig, GasOracleConfig};
use crate::domain::account::parse_address;
use crate::domain::chain::ChainConfig;
use crate::domain::transaction::SendTxParams;
use crate::infrastructure::blockchain::gas::gwei_to_wei;
use crate::infrastructure::blockchain::{
    BlockTag, EthereumGateway, FALLBACK_GAS_PRICE_GWEI, GasPriceOracle, RpcGateway, TxHash,
    TxReceipt,
};
use crate::infrastructure::keystore::KeyStore;
use ethers::types::{Bytes, U256};
use std::sync::Arc;
use tracing::{debug, info};

/// Ethereum JSON-RPC client with a local key store.
#[derive(Debug)]
pub struct Web3Client {
    gateway: Arc<dyn RpcGateway>,
    keystore: KeyStore,
    signer: Arc<dyn TransactionSigner>,
    chain: ChainConfig,
    oracle: Option<GasPriceOracle>,
}

impl Web3Client {
    /// Connects to a node, resolving the chain from `NETWORK`.
    ///
    /// Terminates the process if `NETWORK` is missing or unsupported.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the endpoint URL is invalid or
    /// the HTTP clients cannot be built.
    pub fn new(rpc_url: &str) -> ClientResult<Self> {
        let chain = ChainConfig::resolve_or_exit();
        Self::connect(rpc_url, &GasOracleConfig::default(), chain)
    }

    /// Builds a client from loaded configuration, resolving the chain from
    /// `NETWORK`.
    ///
    /// Terminates the process if `NETWORK` is missing or unsupported.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the endpoint URL is invalid or
    /// the HTTP clients cannot be built.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let chain = ChainConfig::resolve_or_exit();
        Self::connect(&config.rpc_url, &config.gas_oracle, chain)
    }

    /// Connects to a node for an already resolved chain.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the endpoint URL is invalid or
    /// the HTTP clients cannot be built.
    pub fn connect(
        rpc_url: &str,
        gas_oracle: &GasOracleConfig,
        chain: ChainConfig,
    ) -> ClientResult<Self> {
        let gateway = EthereumGateway::new(rpc_url)
            .map_err(|e| ClientError::configuration(format!("rpc endpoint {rpc_url}: {e}")))?;
        let oracle = GasPriceOracle::new(&gas_oracle.url, gas_oracle.timeout_ms)
            .map_err(|e| ClientError::configuration(format!("gas oracle: {e}")))?;

        info!(rpc_url, %chain, "web3 client created");
        Ok(Self::with_gateway(Arc::new(gateway), chain).with_gas_oracle(oracle))
    }

    /// Creates a client over an existing gateway and chain selection.
    ///
    /// The client signs locally and has no gas oracle until one is attached.
    #[must_use]
    pub fn with_gateway(gateway: Arc<dyn RpcGateway>, chain: ChainConfig) -> Self {
        Self {
            gateway,
            keystore: KeyStore::new(),
            signer: Arc::new(LocalSigner::new()),
            chain,
            oracle: None,
        }
    }

    /// Replaces the transaction signer.
    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn TransactionSigner>) -> Self {
        self.signer = signer;
        self
    }

    /// Attaches a gas price oracle.
    #[must_use]
    pub fn with_gas_oracle(mut self, oracle: GasPriceOracle) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Returns the chain selection every signature is bound to.
    #[must_use]
    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    /// Returns the node gateway.
    #[must_use]
    pub fn gateway(&self) -> &dyn RpcGateway {
        self.gateway.as_ref()
    }

    /// Returns the key store.
    #[must_use]
    pub fn keystore(&self) -> &KeyStore {
        &self.keystore
    }

    /// Returns a transaction builder over this client's collaborators.
    #[must_use]
    pub fn transaction_builder(&self) -> TransactionBuilder<'_> {
        TransactionBuilder::new(
            &self.keystore,
            self.gateway.as_ref(),
            self.signer.as_ref(),
            &self.chain,
        )
    }

    /// Registers an account and returns its canonical address.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidKeyFormat` if the key cannot be parsed.
    pub fn add_account(&self, private_key: &str) -> ClientResult<String> {
        Ok(self.keystore.add_account(private_key)?)
    }

    /// Returns the private key registered for `address`, if any.
    #[must_use]
    pub fn lookup(&self, address: &str) -> Option<String> {
        self.keystore.lookup(address)
    }

    /// Returns every registered address, in registration order.
    #[must_use]
    pub fn accounts(&self) -> Vec<String> {
        self.keystore.accounts()
    }

    /// Returns the balance of `address` in wei at the latest block.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidAddressFormat` or `ClientError::Rpc`.
    pub async fn balance_of(&self, address: &str) -> ClientResult<U256> {
        let address = parse_address(address)?;
        Ok(self.gateway.balance_of(address, BlockTag::Latest).await?)
    }

    /// Returns the transaction count of `address` at the latest block.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidAddressFormat` or `ClientError::Rpc`.
    pub async fn nonce_of(&self, address: &str) -> ClientResult<u64> {
        let address = parse_address(address)?;
        Ok(self
            .gateway
            .transaction_count(address, BlockTag::Latest)
            .await?)
    }

    /// Binds a contract interface to a deployed address.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidAbiDescription` or
    /// `ClientError::InvalidAddressFormat`.
    pub fn new_contract(&self, abi: &str, address: &str) -> ClientResult<ContractBinding<'_>> {
        let interface = ContractInterface::parse(abi)?;
        let address = parse_address(address)?;
        Ok(ContractBinding::new(self, interface, address))
    }

    /// Binds an already parsed interface to a deployed address.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidAddressFormat`.
    pub fn bind(
        &self,
        interface: ContractInterface,
        address: &str,
    ) -> ClientResult<ContractBinding<'_>> {
        let address = parse_address(address)?;
        Ok(ContractBinding::new(self, interface, address))
    }

    /// Sends ether with an empty payload.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddressFormat`, `AccountNotRegistered`, `SigningFailed`
    /// or `BroadcastFailed`.
    pub async fn transfer_eth(
        &self,
        params: &SendTxParams,
        to: &str,
        value: U256,
    ) -> ClientResult<TxHash> {
        let to = parse_address(to)?;
        self.transaction_builder()
            .send(params, to, value, || Ok(Bytes::default()))
            .await
    }

    /// Returns the receipt of a mined transaction, or `None` if it is
    /// unknown or still pending.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rpc` if the lookup fails.
    pub async fn transaction_receipt(&self, hash: &TxHash) -> ClientResult<Option<TxReceipt>> {
        Ok(self.gateway.transaction_receipt(hash).await?)
    }

    /// Returns a gas price suggestion in gwei.
    ///
    /// Never fails: without an oracle, or when the oracle is unusable, the
    /// fallback price is returned.
    pub async fn suggest_gas_price_gwei(&self) -> u64 {
        match &self.oracle {
            Some(oracle) => oracle.suggest_gas_price_gwei().await,
            None => {
                debug!(
                    fallback = FALLBACK_GAS_PRICE_GWEI,
                    "no gas oracle configured"
                );
                FALLBACK_GAS_PRICE_GWEI
            }
        }
    }

    /// Returns a gas price suggestion in wei.
    pub async fn suggest_gas_price_wei(&self) -> U256 {
        gwei_to_wei(self.suggest_gas_price_gwei().await)
    }
}
