//! Error types for willchain-client

use thiserror::Error;
use willchain_core::ValidationError;

/// Failure reported by a contract collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// No wallet or provider to sign with
    #[error("Not connected to a wallet provider")]
    NotConnected,

    /// The transaction or call was reverted or refused
    #[error("Contract rejected the call: {0}")]
    Rejected(String),

    /// The node could not be reached
    #[error("Contract unavailable: {0}")]
    Unavailable(String),
}

/// Client error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),

    #[error("No active account")]
    NoActiveAccount,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
