//! Will record normalizer
//!
//! The single conversion boundary between chain-shaped structs and the
//! [`WillRecord`] view-model.
//!
//! Decoding degrades instead of failing: each field that cannot be read falls
//! back to a default (0, empty string, or the current time), so one malformed
//! will never blocks rendering a whole list. Encoding is strict and rejects
//! any draft that breaks an invariant before a transaction is attempted.

use crate::beneficiary::{map_chain_tuples, to_write_payload};
use crate::config::WillchainConfig;
use crate::decode::{decode_chain_int, epoch_seconds, instant_from_seconds};
use crate::error::{DecodeError, ValidationError};
use crate::identity::WillId;
use crate::query::WillBook;
use crate::record::{ChainWillStruct, ChainWritePayload, WillRecord, WillRecordDraft, WillStatus};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Required sum of all beneficiary shares
pub const SHARE_TOTAL: u64 = 100;

/// Converts raw contract structs to records and drafts to write payloads
#[derive(Debug, Clone, Default)]
pub struct WillNormalizer {
    config: WillchainConfig,
}

impl WillNormalizer {
    /// Create a normalizer with the given configuration
    pub fn new(config: WillchainConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &WillchainConfig {
        &self.config
    }

    /// Decode a raw struct into a record, using the current time as fallback
    pub fn decode(&self, raw: &ChainWillStruct) -> WillRecord {
        self.decode_at(raw, Utc::now())
    }

    /// Decode a raw struct into a record
    ///
    /// `now` is the fallback for an unreadable release time and the reference
    /// point for the derived status.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use willchain_core::{ChainWillStruct, DisplayZone, WillNormalizer, WillchainConfig};
    ///
    /// let raw: ChainWillStruct = serde_json::from_str(
    ///     r#"{"willId": "0xb5", "assetName": "House", "assetCategory": "Real Estate",
    ///         "releaseTime": "0x6580f100",
    ///         "beneficiaries": [["0xAAA", "0x32", null, "Alice"], ["0xBBB", "0x32", null, "Bob"]]}"#,
    /// ).unwrap();
    ///
    /// let config = WillchainConfig::default().with_zone(DisplayZone::Utc);
    /// let normalizer = WillNormalizer::new(config);
    /// let now = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    /// let record = normalizer.decode_at(&raw, now);
    ///
    /// assert_eq!(record.will_id.raw(), 181);
    /// assert_eq!(record.release_timestamp, 0x6580f100);
    /// assert_eq!(record.beneficiaries[1].name, "Bob");
    /// assert_eq!(record.total_share(), 100);
    /// ```
    pub fn decode_at(&self, raw: &ChainWillStruct, now: DateTime<Utc>) -> WillRecord {
        self.decode_record(raw, now).0
    }

    /// Decode a batch of raw structs into a book keyed by will id
    ///
    /// Later duplicates of an id replace earlier ones in place. Wills whose id
    /// could not be decoded are all kept, in order.
    pub fn decode_all<'a>(&self, raws: impl IntoIterator<Item = &'a ChainWillStruct>) -> WillBook {
        let now = Utc::now();
        let mut book = WillBook::new();
        for raw in raws {
            match self.decode_record(raw, now) {
                (record, true) => {
                    book.insert(record);
                }
                (record, false) => book.push_unkeyed(record),
            }
        }
        book
    }

    /// Decode a raw struct, also reporting whether its id was decoded
    fn decode_record(&self, raw: &ChainWillStruct, now: DateTime<Utc>) -> (WillRecord, bool) {
        let (will_id, id_decoded) = match decode_chain_int(&raw.will_id)
            .and_then(|id| u64::try_from(id).map_err(|_| DecodeError::Overflow(id.to_string())))
        {
            Ok(id) => (id, true),
            Err(err) => {
                self.fallback("willId", &err);
                (0, false)
            }
        };

        let (release_timestamp, release_instant) = match epoch_seconds(&raw.release_time)
            .and_then(|secs| instant_from_seconds(secs).map(|dt| (secs, dt)))
        {
            Ok(decoded) => decoded,
            Err(err) => {
                self.fallback("releaseTime", &err);
                (now.timestamp(), now)
            }
        };

        let status = derive_status(raw, release_instant, now);

        let record = WillRecord {
            will_id: WillId::new(will_id),
            asset_name: raw.asset_name.clone().unwrap_or_default(),
            asset_category: raw.asset_category.clone().unwrap_or_default(),
            release_timestamp,
            release_display: self.config.zone.render(release_instant),
            beneficiaries: map_chain_tuples(
                &raw.beneficiaries,
                self.config.warn_on_decode_fallback,
            ),
            status,
            requires_registrar_review: self.config.requires_registrar_review(will_id),
        };
        (record, id_decoded)
    }

    /// Encode a draft into a write payload
    ///
    /// Rejects, in order: missing asset name, missing asset category, no
    /// beneficiaries, any incomplete beneficiary or zero share, a share total
    /// other than 100, and a release time that is not a calendar date.
    pub fn encode(&self, draft: &WillRecordDraft) -> Result<ChainWritePayload, ValidationError> {
        let result = encode_draft(draft);
        match &result {
            Ok(_) => debug!(will_id = draft.will_id.raw(), "encoded will draft"),
            Err(err) => debug!(will_id = draft.will_id.raw(), %err, "rejected will draft"),
        }
        result
    }

    fn fallback(&self, field: &'static str, err: &DecodeError) {
        if self.config.warn_on_decode_fallback {
            warn!(field, %err, "undecodable will field, using default");
        }
    }
}

fn encode_draft(draft: &WillRecordDraft) -> Result<ChainWritePayload, ValidationError> {
    if draft.asset_name.trim().is_empty() {
        return Err(ValidationError::AssetNameRequired);
    }
    if draft.asset_category.trim().is_empty() {
        return Err(ValidationError::AssetCategoryRequired);
    }
    if draft.beneficiaries.is_empty() {
        return Err(ValidationError::NoBeneficiaries);
    }

    let beneficiaries = to_write_payload(&draft.beneficiaries)?;
    let total = beneficiaries
        .shares
        .iter()
        .try_fold(0u64, |sum, share| sum.checked_add(*share));
    if total != Some(SHARE_TOTAL) {
        let total = beneficiaries.shares.iter().map(|s| *s as f64).sum();
        return Err(ValidationError::ShareTotal { total });
    }

    if draft.release_timestamp < 0 || instant_from_seconds(draft.release_timestamp).is_err() {
        return Err(ValidationError::InvalidReleaseTime(
            draft.release_timestamp.to_string(),
        ));
    }

    Ok(ChainWritePayload {
        will_id: draft.will_id.raw(),
        addresses: beneficiaries.addresses,
        shares: beneficiaries.shares,
        names: beneficiaries.names,
        release_time: draft.release_timestamp,
        asset_name: draft.asset_name.trim().to_string(),
        asset_category: draft.asset_category.trim().to_string(),
        deposit: draft.deposit,
    })
}

fn derive_status(raw: &ChainWillStruct, release: DateTime<Utc>, now: DateTime<Utc>) -> WillStatus {
    if raw.verified == Some(true) {
        WillStatus::Verified
    } else if raw.executed == Some(true) {
        WillStatus::Executed
    } else if release > now {
        WillStatus::Active
    } else {
        WillStatus::Pending
    }
}
