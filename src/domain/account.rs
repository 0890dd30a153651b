//! # Account
//!
//! A locally controlled account: a private key and the address derived from it.
//!
//! Addresses are represented canonically as `0x`-prefixed lowercase hex.

use super::errors::{DomainError, DomainResult};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use ethers::utils::hex;
use std::fmt;

/// Formats an address in canonical form (`0x` + 40 lowercase hex digits).
#[must_use]
pub fn canonical_address(address: &Address) -> String {
    format!("{address:#x}")
}

/// Normalizes a textual address for case-insensitive lookups.
///
/// Trims whitespace, lowercases, and adds the `0x` prefix when missing.
#[must_use]
pub fn normalize_address(address: &str) -> String {
    let lower = address.trim().to_ascii_lowercase();
    if lower.starts_with("0x") {
        lower
    } else {
        format!("0x{lower}")
    }
}

/// Parses a textual address.
///
/// # Errors
///
/// Returns `DomainError::InvalidAddressFormat` unless the input is 20 bytes
/// of hex, with or without the `0x` prefix.
pub fn parse_address(address: &str) -> DomainResult<Address> {
    let normalized = normalize_address(address);
    let digits = normalized.trim_start_matches("0x");
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DomainError::InvalidAddressFormat(address.to_string()));
    }
    normalized
        .parse()
        .map_err(|_| DomainError::InvalidAddressFormat(address.to_string()))
}

/// An account controlled by this process.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    address: Address,
    private_key: String,
}

impl Account {
    /// Derives an account from a hex-encoded secp256k1 private key.
    ///
    /// The stored key is the input trimmed and lowercased.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidKeyFormat` if the key is not 32 bytes of
    /// hex or is not a valid secp256k1 scalar.
    pub fn from_private_key(private_key: &str) -> DomainResult<Self> {
        let private_key = private_key.trim().to_ascii_lowercase();
        let wallet = wallet_from_hex(&private_key)?;

        Ok(Self {
            address: wallet.address(),
            private_key,
        })
    }

    /// Returns the derived address.
    #[inline]
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Returns the derived address in canonical form.
    #[must_use]
    pub fn address_hex(&self) -> String {
        canonical_address(&self.address)
    }

    /// Returns the lowercase private key as registered.
    #[inline]
    #[must_use]
    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address_hex())
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Builds a signing wallet from a hex private key (optional `0x` prefix).
///
/// # Errors
///
/// Returns `DomainError::InvalidKeyFormat` if the key cannot be parsed.
pub fn wallet_from_hex(private_key: &str) -> DomainResult<LocalWallet> {
    let digits = private_key
        .strip_prefix("0x")
        .or_else(|| private_key.strip_prefix("0X"))
        .unwrap_or(private_key);

    if digits.len() != 64 {
        return Err(DomainError::InvalidKeyFormat(format!(
            "expected 64 hex digits, got {}",
            digits.len()
        )));
    }

    let bytes = hex::decode(digits).map_err(|e| DomainError::InvalidKeyFormat(e.to_string()))?;
    LocalWallet::from_bytes(&bytes).map_err(|e| DomainError::InvalidKeyFormat(e.to_string()))
}
