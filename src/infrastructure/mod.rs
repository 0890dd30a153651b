//! # Infrastructure Layer
//!
//! Adapters to the outside world and in-process state.
//!
//! - [`blockchain`]: JSON-RPC gateway port, ethers adapter, in-memory
//!   recorder and the gas price oracle
//! - [`http_client`]: shared JSON-over-HTTP client
//! - [`keystore`]: registry of locally controlled accounts

pub mod blockchain;
pub mod http_client;
pub mod keystore;

pub use keystore::KeyStore;
