//! # Web3 Client
//!
//! Client-side Ethereum toolkit: an in-process key store, ABI-encoded
//! contract calls, and locally signed transactions broadcast over JSON-RPC.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Domain Layer** (`domain`): accounts, chain selection, transaction value types
//! - **Application Layer** (`application`): the client, contract bindings, the write path
//! - **Infrastructure Layer** (`infrastructure`): key store, node gateways, gas price oracle
//! - **Configuration** (`config`): settings loading and tracing setup
//!
//! The chain id every signature commits to is read once from the `NETWORK`
//! environment variable (`mainnet` or `kovan`) when a client is created. A
//! missing or unknown value terminates the process.
//!
//! ## Example
//!
//! ```rust,ignore
//! use web3_client::{SendTxParams, Web3Client};
//! use ethers::abi::Token;
//!
//! let client = Web3Client::new("http://localhost:8545")?;
//! let sender = client.add_account(private_key)?;
//!
//! let token = client.new_contract(erc20_abi, token_address)?;
//! let supply = token.call_decoded("totalSupply", &[]).await?;
//!
//! let gas_price = client.suggest_gas_price_wei().await;
//! let params = SendTxParams::new(&sender, 60_000u64, gas_price, client.nonce_of(&sender).await?);
//! let hash = token
//!     .send(&params, 0.into(), "transfer", &[Token::Address(recipient), Token::Uint(amount)])
//!     .await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{ClientError, ClientResult, ContractBinding, ContractInterface, Web3Client};
pub use domain::{ChainConfig, Network, SendTxParams};
pub use infrastructure::blockchain::{BlockTag, TxHash, TxReceipt};
