//! # Application Layer
//!
//! Client operations built on the domain types and infrastructure adapters.
//!
//! - [`client`]: the [`Web3Client`] entry point
//! - [`abi`]: contract interface parsing and call encoding
//! - [`contract`]: contract bindings for reads and writes
//! - [`transaction_builder`]: the staged write path
//! - [`signer`]: transaction signing
//! - [`error`]: caller-facing errors

pub mod abi;
pub mod client;
pub mod contract;
pub mod error;
pub mod signer;
pub mod transaction_builder;


pub use abi::ContractInterface;
pub use client::Web3Client;
pub use contract::ContractBinding;
pub use error::{ClientError, ClientResult};
pub use signer::{LocalSigner, TransactionSigner};
pub use transaction_builder::TransactionBuilder;
