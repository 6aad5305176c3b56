//! Contract collaborator seam
//!
//! The will contract itself and the transport to it live outside this
//! workspace. Implementations block until the call resolves (for writes,
//! until the transaction is confirmed).

use crate::error::ContractError;
use serde::{Deserialize, Serialize};
use std::fmt;
use willchain_core::{Address, ChainWillStruct, ChainWritePayload, WillId};

/// Confirmation of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
}

impl TxReceipt {
    /// Create a receipt for a transaction hash
    pub fn new(tx_hash: impl Into<String>) -> Self {
        Self { tx_hash: tx_hash.into() }
    }
}

/// Calls exposed by the deployed will contract
pub trait WillContract {
    /// Create a will; `payload.deposit` is sent as the transaction value
    fn create_will(&mut self, payload: &ChainWritePayload) -> Result<TxReceipt, ContractError>;

    /// Replace the asset, beneficiaries and release time of a will
    fn modify_will(&mut self, payload: &ChainWritePayload) -> Result<TxReceipt, ContractError>;

    /// Verify a released will and pay out its beneficiaries
    fn verify_will(&mut self, will_id: WillId) -> Result<TxReceipt, ContractError>;

    /// Withdraw the funds held for a will
    fn withdraw_funds(&mut self, will_id: WillId) -> Result<TxReceipt, ContractError>;

    /// Delete a will
    fn delete_will(&mut self, will_id: WillId) -> Result<TxReceipt, ContractError>;

    /// Wills created by `owner`
    fn owner_wills(&self, owner: &Address) -> Result<Vec<ChainWillStruct>, ContractError>;

    /// Wills naming `beneficiary`
    fn beneficiary_wills(
        &self,
        beneficiary: &Address,
    ) -> Result<Vec<ChainWillStruct>, ContractError>;
}

/// Contract operations, for notices and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    CreateWill,
    ModifyWill,
    VerifyWill,
    WithdrawFunds,
    DeleteWill,
    FetchOwnerWills,
    FetchBeneficiaryWills,
}

impl Operation {
    /// Message reported when the operation succeeds, if any
    pub fn success_message(&self) -> Option<&'static str> {
        match self {
            Operation::CreateWill => Some("Will created successfully!"),
            Operation::ModifyWill => Some("Will modified successfully!"),
            Operation::VerifyWill => Some("Will verified and funds withdrawn successfully!"),
            Operation::WithdrawFunds => Some("Funds withdrawn successfully!"),
            Operation::DeleteWill => Some("Will deleted successfully!"),
            Operation::FetchOwnerWills | Operation::FetchBeneficiaryWills => None,
        }
    }

    /// Message reported when the operation fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::CreateWill => "Failed to create will.",
            Operation::ModifyWill => "Failed to modify will.",
            Operation::VerifyWill => "Failed to verify will.",
            Operation::WithdrawFunds => "Failed to withdraw funds.",
            Operation::DeleteWill => "Failed to delete will.",
            Operation::FetchOwnerWills => "Failed to fetch owner's wills.",
            Operation::FetchBeneficiaryWills => "Failed to fetch beneficiary's wills.",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::CreateWill => "createWill",
            Operation::ModifyWill => "modifyWill",
            Operation::VerifyWill => "verifyWill",
            Operation::WithdrawFunds => "withdrawFunds",
            Operation::DeleteWill => "deleteWill",
            Operation::FetchOwnerWills => "getOwnerWills",
            Operation::FetchBeneficiaryWills => "getBeneficiaryWills",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(Operation::CreateWill.success_message(), Some("Will created successfully!"));
        assert_eq!(Operation::FetchOwnerWills.success_message(), None);
        assert_eq!(Operation::DeleteWill.failure_message(), "Failed to delete will.");
        assert_eq!(Operation::WithdrawFunds.to_string(), "withdrawFunds");
    }
}
