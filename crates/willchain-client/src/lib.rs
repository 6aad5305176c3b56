//! Willchain Client - Session and contract-call plumbing
//!
//! Sits between a front end and the will contract:
//! - `SessionContext` holds the active account and notifies subscribers
//! - `WillContract` is the seam a contract binding implements
//! - `TransactionContext` validates drafts before writes, decodes reads,
//!   and queues a `Notice` for every outcome
//!
//! ```
//! use willchain_client::{SessionContext, SessionEvent};
//! use willchain_core::Address;
//!
//! let mut session = SessionContext::new();
//! session.subscribe(|event| match event {
//!     SessionEvent::AccountChanged { current, .. } => {
//!         let _ = current;
//!     }
//! });
//! assert!(session.set_active_account(Some(Address::from("0xAAA"))));
//! ```

mod context;
mod contract;
mod error;
mod session;

pub use context::{Notice, NoticeLevel, TransactionContext};
pub use contract::{Operation, TxReceipt, WillContract};
pub use error::{ContractError, Error, Result};
pub use session::{SessionContext, SessionEvent, SubscriptionId};
