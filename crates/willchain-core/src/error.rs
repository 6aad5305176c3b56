//! Error types for willchain-core

use thiserror::Error;

/// A chain-native value could not be converted
///
/// Never escapes [`WillNormalizer::decode`](crate::WillNormalizer::decode);
/// each field falls back to its default instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Invalid hex value: {0:?}")]
    InvalidHex(String),

    #[error("Value does not fit in the target integer: {0}")]
    Overflow(String),

    #[error("Not an integer: {0}")]
    NotAnInteger(String),

    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(i128),

    #[error("Invalid date/time: {0:?}")]
    InvalidDateTime(String),

    #[error("Invalid ether amount: {0:?}")]
    InvalidEtherAmount(String),
}

/// A write-path draft broke one of the will invariants
///
/// The `Display` text is the message shown to the user. Validation stops at
/// the first failing rule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Asset selection is required.")]
    AssetNameRequired,

    #[error("Asset category is required.")]
    AssetCategoryRequired,

    #[error("At least one beneficiary is required.")]
    NoBeneficiaries,

    #[error("All beneficiaries must have a name and a percentage allocation.")]
    IncompleteBeneficiary { index: usize },

    #[error("Beneficiary {} is missing a wallet address.", .index + 1)]
    MissingAddress { index: usize },

    #[error("Beneficiary {} is missing a name.", .index + 1)]
    MissingName { index: usize },

    #[error("Beneficiary {} must have a positive share.", .index + 1)]
    NonPositiveShare { index: usize },

    #[error("Beneficiary {}: {value:?} is not a valid percentage.", .index + 1)]
    InvalidShare { index: usize, value: String },

    #[error("Percentage allocations must be whole numbers.")]
    FractionalShare { index: usize },

    #[error("The total allocation percentage must equal 100% (currently {total}%).")]
    ShareTotal { total: f64 },

    #[error("Release date and time are required.")]
    ReleaseTimeRequired,

    #[error("Release date and time are not valid: {0:?}")]
    InvalidReleaseTime(String),

    #[error("Release date and time must be in the future.")]
    ReleaseTimeNotInFuture,

    #[error("Will ID must be a non-negative integer: {0:?}")]
    InvalidWillId(String),

    #[error("Amount must be an ether value: {0:?}")]
    InvalidAmount(String),
}

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
