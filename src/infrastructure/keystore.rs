//! # Key Store
//!
//! In-process registry of the accounts this client can sign for.
//!
//! The store is internally synchronized: registration takes a write lock,
//! lookups take a read lock, and the store can be shared across threads
//! behind an `Arc` or a plain reference. Accounts are never removed once
//! registered.

use crate::domain::account::{Account, normalize_address};
use crate::domain::errors::DomainResult;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::info;

#[derive(Debug, Default)]
struct Inner {
    by_address: HashMap<String, Account>,
    order: Vec<String>,
}

/// Append-only address → private key registry.
#[derive(Debug, Default)]
pub struct KeyStore {
    inner: RwLock<Inner>,
}

impl KeyStore {
    /// Creates an empty key store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account from a hex private key and returns its
    /// canonical address.
    ///
    /// Registering the same key twice is a no-op that returns the same
    /// address; the first registered key text is kept.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidKeyFormat` if the key cannot be parsed.
    pub fn add_account(&self, private_key: &str) -> DomainResult<String> {
        let account = Account::from_private_key(private_key)?;
        let address = account.address_hex();

        let mut inner = self.inner.write();
        if let Entry::Vacant(slot) = inner.by_address.entry(address.clone()) {
            slot.insert(account);
            inner.order.push(address.clone());
            info!(address = %address, accounts = inner.order.len(), "account registered");
        }

        Ok(address)
    }

    /// Returns the lowercase private key registered for `address`.
    ///
    /// The lookup is case-insensitive and accepts addresses with or without
    /// the `0x` prefix.
    #[must_use]
    pub fn lookup(&self, address: &str) -> Option<String> {
        self.account(address)
            .map(|account| account.private_key().to_string())
    }

    /// Returns the account registered for `address`.
    #[must_use]
    pub fn account(&self, address: &str) -> Option<Account> {
        self.inner
            .read()
            .by_address
            .get(&normalize_address(address))
            .cloned()
    }

    /// Returns true if `address` has been registered.
    #[must_use]
    pub fn contains(&self, address: &str) -> bool {
        self.inner
            .read()
            .by_address
            .contains_key(&normalize_address(address))
    }

    /// Returns every registered address, in registration order.
    #[must_use]
    pub fn accounts(&self) -> Vec<String> {
        self.inner.read().order.clone()
    }

    /// Returns the number of registered accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    /// Returns true if no account has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
