//! Transaction context
//!
//! Wraps a [`WillContract`] with the normalizer and the session: drafts are
//! encoded (and rejected) before any call goes out, read results come back as
//! decoded [`WillBook`]s, and every outcome is queued as a [`Notice`] for the
//! UI to show.

use crate::contract::{Operation, TxReceipt, WillContract};
use crate::error::{ContractError, Error, Result};
use crate::session::SessionContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{error, info, warn};
use willchain_core::{Address, WillBook, WillId, WillNormalizer, WillRecordDraft};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Outcome message waiting to be shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    /// Operation that produced the notice; `None` for validation failures
    pub operation: Option<Operation>,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    fn new(level: NoticeLevel, operation: Option<Operation>, message: impl Into<String>) -> Self {
        Self {
            level,
            operation,
            message: message.into(),
            at: Utc::now(),
        }
    }

    /// Check if this notice reports a failure
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Contract calls bound to a session and a normalizer
pub struct TransactionContext<C> {
    contract: C,
    normalizer: WillNormalizer,
    session: SessionContext,
    notices: VecDeque<Notice>,
}

impl<C: WillContract> TransactionContext<C> {
    /// Create a context over a contract
    pub fn new(contract: C, normalizer: WillNormalizer, session: SessionContext) -> Self {
        Self {
            contract,
            normalizer,
            session,
            notices: VecDeque::new(),
        }
    }

    /// Get the session
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Get the session for updates (wallet events)
    pub fn session_mut(&mut self) -> &mut SessionContext {
        &mut self.session
    }

    /// Get the normalizer
    pub fn normalizer(&self) -> &WillNormalizer {
        &self.normalizer
    }

    /// Get the underlying contract
    pub fn contract(&self) -> &C {
        &self.contract
    }

    /// Pending notices, oldest first
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    /// Take all pending notices
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Create a will from a draft
    pub fn create_will(&mut self, draft: &WillRecordDraft) -> Result<TxReceipt> {
        self.require_account()?;
        let payload = self.encode(draft)?;
        self.submit(Operation::CreateWill, draft.will_id, |c| c.create_will(&payload))
    }

    /// Modify a will from a draft
    pub fn modify_will(&mut self, draft: &WillRecordDraft) -> Result<TxReceipt> {
        self.require_account()?;
        let payload = self.encode(draft)?;
        self.submit(Operation::ModifyWill, draft.will_id, |c| c.modify_will(&payload))
    }

    /// Verify a will and release its funds
    pub fn verify_will(&mut self, will_id: WillId) -> Result<TxReceipt> {
        self.require_account()?;
        self.submit(Operation::VerifyWill, will_id, |c| c.verify_will(will_id))
    }

    /// Withdraw the funds held for a will
    pub fn withdraw_funds(&mut self, will_id: WillId) -> Result<TxReceipt> {
        self.require_account()?;
        self.submit(Operation::WithdrawFunds, will_id, |c| c.withdraw_funds(will_id))
    }

    /// Delete a will
    pub fn delete_will(&mut self, will_id: WillId) -> Result<TxReceipt> {
        self.require_account()?;
        self.submit(Operation::DeleteWill, will_id, |c| c.delete_will(will_id))
    }

    /// Wills created by `owner`
    ///
    /// A failed read yields an empty book plus an error notice.
    pub fn owner_wills(&mut self, owner: &Address) -> WillBook {
        let result = self.contract.owner_wills(owner);
        self.fetch(Operation::FetchOwnerWills, result)
    }

    /// Wills naming `beneficiary`
    ///
    /// A failed read yields an empty book plus an error notice.
    pub fn beneficiary_wills(&mut self, beneficiary: &Address) -> WillBook {
        let result = self.contract.beneficiary_wills(beneficiary);
        self.fetch(Operation::FetchBeneficiaryWills, result)
    }

    /// Wills created by the active account
    pub fn my_wills(&mut self) -> Result<WillBook> {
        let account = self.require_account()?;
        Ok(self.owner_wills(&account))
    }

    /// Wills naming the active account as beneficiary
    ///
    /// Check [`WillBook::requires_registrar_review`] on the result to decide
    /// whether to route to the registrar view.
    pub fn my_beneficiary_wills(&mut self) -> Result<WillBook> {
        let account = self.require_account()?;
        Ok(self.beneficiary_wills(&account))
    }

    fn require_account(&self) -> Result<Address> {
        self.session.active_account().cloned().ok_or(Error::NoActiveAccount)
    }

    fn encode(&mut self, draft: &WillRecordDraft) -> Result<willchain_core::ChainWritePayload> {
        self.normalizer.encode(draft).map_err(|err| {
            warn!(will_id = draft.will_id.raw(), %err, "draft rejected before submission");
            self.notices
                .push_back(Notice::new(NoticeLevel::Error, None, err.to_string()));
            Error::Validation(err)
        })
    }

    fn submit(
        &mut self,
        operation: Operation,
        will_id: WillId,
        call: impl FnOnce(&mut C) -> std::result::Result<TxReceipt, ContractError>,
    ) -> Result<TxReceipt> {
        match call(&mut self.contract) {
            Ok(receipt) => {
                info!(
                    %operation,
                    will_id = will_id.raw(),
                    tx = %receipt.tx_hash,
                    "transaction confirmed"
                );
                if let Some(message) = operation.success_message() {
                    self.notices
                        .push_back(Notice::new(NoticeLevel::Success, Some(operation), message));
                }
                Ok(receipt)
            }
            Err(err) => {
                error!(%operation, will_id = will_id.raw(), %err, "transaction failed");
                self.notices.push_back(Notice::new(
                    NoticeLevel::Error,
                    Some(operation),
                    operation.failure_message(),
                ));
                Err(Error::Contract(err))
            }
        }
    }

    fn fetch(
        &mut self,
        operation: Operation,
        result: std::result::Result<Vec<willchain_core::ChainWillStruct>, ContractError>,
    ) -> WillBook {
        match result {
            Ok(raws) => self.normalizer.decode_all(&raws),
            Err(err) => {
                error!(%operation, %err, "contract read failed");
                self.notices.push_back(Notice::new(
                    NoticeLevel::Error,
                    Some(operation),
                    operation.failure_message(),
                ));
                WillBook::new()
            }
        }
    }
}
