//! # Domain Layer
//!
//! Value types shared by the application and infrastructure layers.
//!
//! - [`account`]: locally controlled accounts and address formatting
//! - [`chain`]: network selection and chain id
//! - [`transaction`]: send parameters, intents and signed transactions
//! - [`errors`]: typed domain errors

pub mod account;
pub mod chain;
pub mod errors;
pub mod transaction;

pub use account::{Account, canonical_address, normalize_address, parse_address};
pub use chain::{ChainConfig, NETWORK_ENV_VAR, Network};
pub use errors::{DomainError, DomainResult};
pub use transaction::{SendState, SendTxParams, SignedTransaction, TransactionIntent};
