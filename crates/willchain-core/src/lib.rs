//! Willchain Core - Will view-model normalization
//!
//! Turns the raw structs a will contract returns into render-ready records,
//! and validated form input into contract write payloads:
//! - Chain value decoding (`decode_hex_int`, `decode_epoch_seconds`, ether units)
//! - Beneficiary tuple mapping (`from_chain_tuples`, `to_write_payload`)
//! - Record normalization (`WillNormalizer::decode`, `WillNormalizer::encode`)
//! - Form validation (`WillForm::validate`, `WillForm::to_draft`)
//! - Will lists and queries (`WillBook`, `WillQuery`)
//!
//! Everything here is synchronous and free of shared state. Talking to the
//! contract is left to the caller.
//!
//! ## Data flow
//!
//! ```text
//! WillForm -> WillRecordDraft -> WillNormalizer::encode -> ChainWritePayload -> contract
//! contract -> ChainWillStruct -> WillNormalizer::decode -> WillRecord -> UI
//! ```

pub mod beneficiary;
mod config;
pub mod decode;
mod error;
pub mod form;
mod identity;
pub mod normalizer;
mod query;
mod record;
mod value;

pub use beneficiary::{
    from_chain_tuples, to_write_payload, Beneficiary, BeneficiaryPayload, ChainBeneficiary,
};
pub use config::{WillchainConfig, DEFAULT_REGISTRAR_REVIEW_ID};
pub use decode::{
    decode_chain_int, decode_epoch_seconds, decode_epoch_seconds_at, decode_hex_int, decode_share,
    encode_epoch_seconds, encode_epoch_seconds_in, format_ether, parse_ether, DisplayZone,
};
pub use error::{DecodeError, Error, Result, ValidationError};
pub use form::{BeneficiaryFields, WillForm};
pub use identity::{Address, WillId};
pub use normalizer::{WillNormalizer, SHARE_TOTAL};
pub use query::{SortOrder, WillBook, WillQuery};
pub use record::{ChainWillStruct, ChainWritePayload, Wei, WillRecord, WillRecordDraft, WillStatus};
pub use value::ChainValue;
