//! # Blockchain Gateways
//!
//! Access to an Ethereum-compatible node and to the gas price oracle.
//!
//! ## Available Components
//!
//! - [`RpcGateway`]: Trait for the remote node operations
//! - [`EthereumGateway`]: ethers-rs HTTP implementation
//! - [`RecordingGateway`]: In-memory implementation for tests
//! - [`GasPriceOracle`]: Best-effort gas price suggestions

pub mod client;
pub mod ethereum;
pub mod gas;
pub mod recording;

pub use client::{
    BlockTag, BlockchainError, BlockchainResult, CallRequest, ReceiptLog, RpcGateway, TxHash,
    TxReceipt,
};
pub use ethereum::EthereumGateway;
pub use gas::{FALLBACK_GAS_PRICE_GWEI, GasPriceOracle, GasStationPrices};
pub use recording::{RecordedCall, RecordingGateway};
