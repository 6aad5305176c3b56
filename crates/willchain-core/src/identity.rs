//! Identity types for wills and chain accounts

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the contract assigns to a will at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WillId(pub u64);

impl WillId {
    /// Create a new will ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "will:{}", self.0)
    }
}

impl From<u64> for WillId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Chain account identifier
///
/// Kept as the string the wallet hands out. Checksum and format checks belong
/// to the wallet and contract, so the only thing enforced here is
/// non-emptiness on the write path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    /// Create a new address
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Get the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the address is blank
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Case-insensitive comparison, since wallets disagree on checksum casing
    pub fn matches(&self, other: &Address) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}
