//! Form-to-payload adapter
//!
//! Binds the raw strings of a will form to a [`WillRecordDraft`]. Validation
//! runs rule by rule and reports only the first failure, which is what the
//! user sees:
//!
//! 1. asset name present
//! 2. asset category present
//! 3. at least one beneficiary
//! 4. every beneficiary has a name and a percentage
//! 5. every beneficiary has an address
//! 6. every percentage is a positive whole number
//! 7. percentages sum to exactly 100
//! 8. release date/time present, parseable, and far enough in the future
//! 9. will id and amount, when given, are well formed

use crate::beneficiary::Beneficiary;
use crate::config::WillchainConfig;
use crate::decode::{encode_epoch_seconds_in, instant_from_seconds, parse_ether};
use crate::error::ValidationError;
use crate::identity::WillId;
use crate::normalizer::SHARE_TOTAL;
use crate::record::{Wei, WillRecord, WillRecordDraft};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw input of one beneficiary row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeneficiaryFields {
    pub address: String,
    pub name: String,
    pub percentage: String,
}

impl BeneficiaryFields {
    /// Create a filled-in row
    pub fn new(
        address: impl Into<String>,
        name: impl Into<String>,
        percentage: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
            percentage: percentage.into(),
        }
    }
}

/// Raw input of the create/modify will form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WillForm {
    /// Will id as typed; blank means 0
    pub will_id: String,
    pub asset_name: String,
    pub asset_category: String,
    /// `YYYY-MM-DDTHH:MM` datetime input, or UNIX seconds
    pub release: String,
    /// Ether sent with a create call; blank for none
    pub amount: String,
    pub beneficiaries: Vec<BeneficiaryFields>,
}

impl Default for WillForm {
    /// An empty form with one blank beneficiary row
    fn default() -> Self {
        Self {
            will_id: String::new(),
            asset_name: String::new(),
            asset_category: String::new(),
            release: String::new(),
            amount: String::new(),
            beneficiaries: vec![BeneficiaryFields::default()],
        }
    }
}

impl WillForm {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill the form from a decoded record for modification
    pub fn from_record(record: &WillRecord) -> Self {
        Self {
            will_id: record.will_id.raw().to_string(),
            asset_name: record.asset_name.clone(),
            asset_category: record.asset_category.clone(),
            release: record.release_display.clone(),
            amount: String::new(),
            beneficiaries: record
                .beneficiaries
                .iter()
                .map(|b| {
                    BeneficiaryFields::new(b.address.as_str(), b.name.clone(), b.share.to_string())
                })
                .collect(),
        }
    }

    /// Append a blank beneficiary row
    pub fn add_beneficiary(&mut self) {
        self.beneficiaries.push(BeneficiaryFields::default());
    }

    /// Remove a beneficiary row
    pub fn remove_beneficiary(&mut self, index: usize) -> Option<BeneficiaryFields> {
        (index < self.beneficiaries.len()).then(|| self.beneficiaries.remove(index))
    }

    /// Sum of the percentages typed so far, counting blanks as 0
    pub fn total_percentage(&self) -> f64 {
        self.beneficiaries
            .iter()
            .map(|b| b.percentage.trim().parse::<f64>().unwrap_or(0.0))
            .sum()
    }

    /// Validate the form against the current time
    pub fn validate(&self, config: &WillchainConfig) -> Result<(), ValidationError> {
        self.validate_at(config, Utc::now())
    }

    /// Validate the form, reporting the first failing rule
    pub fn validate_at(
        &self,
        config: &WillchainConfig,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        self.parse(config, now).map(|_| ())
    }

    /// Validate and convert the form into a draft
    pub fn to_draft(&self, config: &WillchainConfig) -> Result<WillRecordDraft, ValidationError> {
        self.to_draft_at(config, Utc::now())
    }

    /// Validate and convert the form into a draft, against `now`
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use willchain_core::{BeneficiaryFields, DisplayZone, WillForm, WillchainConfig};
    ///
    /// let form = WillForm {
    ///     will_id: "11".into(),
    ///     asset_name: "House".into(),
    ///     asset_category: "Real Estate".into(),
    ///     release: "2030-01-01T12:00".into(),
    ///     amount: "0.01".into(),
    ///     beneficiaries: vec![BeneficiaryFields::new("0xf40b", "John Doe", "100")],
    /// };
    /// let config = WillchainConfig::default().with_zone(DisplayZone::Utc);
    /// let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    ///
    /// let draft = form.to_draft_at(&config, now).unwrap();
    /// assert_eq!(draft.will_id.raw(), 11);
    /// assert_eq!(draft.beneficiaries[0].share, 100);
    /// assert_eq!(draft.deposit.map(|d| d.raw()), Some(10_000_000_000_000_000));
    /// ```
    pub fn to_draft_at(
        &self,
        config: &WillchainConfig,
        now: DateTime<Utc>,
    ) -> Result<WillRecordDraft, ValidationError> {
        let draft = self.parse(config, now);
        if let Err(err) = &draft {
            debug!(%err, "will form rejected");
        }
        draft
    }

    fn parse(
        &self,
        config: &WillchainConfig,
        now: DateTime<Utc>,
    ) -> Result<WillRecordDraft, ValidationError> {
        let asset_name = self.asset_name.trim();
        if asset_name.is_empty() {
            return Err(ValidationError::AssetNameRequired);
        }
        let asset_category = self.asset_category.trim();
        if asset_category.is_empty() {
            return Err(ValidationError::AssetCategoryRequired);
        }
        if self.beneficiaries.is_empty() {
            return Err(ValidationError::NoBeneficiaries);
        }

        let beneficiaries = self.parse_beneficiaries()?;
        let release_timestamp = self.parse_release(config, now)?;

        let will_id = match self.will_id.trim() {
            "" => 0,
            id => id
                .parse::<u64>()
                .map_err(|_| ValidationError::InvalidWillId(self.will_id.clone()))?,
        };
        let deposit = match self.amount.trim() {
            "" => None,
            amount => {
                let wei = parse_ether(amount)
                    .map_err(|_| ValidationError::InvalidAmount(self.amount.clone()))?;
                Some(Wei(wei))
            }
        };

        Ok(WillRecordDraft {
            will_id: WillId::new(will_id),
            asset_name: asset_name.to_string(),
            asset_category: asset_category.to_string(),
            release_timestamp,
            beneficiaries,
            deposit,
        })
    }

    fn parse_beneficiaries(&self) -> Result<Vec<Beneficiary>, ValidationError> {
        for (index, row) in self.beneficiaries.iter().enumerate() {
            if row.name.trim().is_empty() || row.percentage.trim().is_empty() {
                return Err(ValidationError::IncompleteBeneficiary { index });
            }
        }
        for (index, row) in self.beneficiaries.iter().enumerate() {
            if row.address.trim().is_empty() {
                return Err(ValidationError::MissingAddress { index });
            }
        }

        let mut shares = Vec::with_capacity(self.beneficiaries.len());
        for (index, row) in self.beneficiaries.iter().enumerate() {
            let percentage: f64 =
                row.percentage
                    .trim()
                    .parse()
                    .map_err(|_| ValidationError::InvalidShare {
                        index,
                        value: row.percentage.clone(),
                    })?;
            if !percentage.is_finite() {
                return Err(ValidationError::InvalidShare {
                    index,
                    value: row.percentage.clone(),
                });
            }
            if percentage <= 0.0 {
                return Err(ValidationError::NonPositiveShare { index });
            }
            if percentage.fract() != 0.0 {
                return Err(ValidationError::FractionalShare { index });
            }
            shares.push(percentage);
        }

        let total: f64 = shares.iter().sum();
        if total != SHARE_TOTAL as f64 {
            return Err(ValidationError::ShareTotal { total });
        }

        Ok(self
            .beneficiaries
            .iter()
            .zip(shares)
            .map(|(row, share)| Beneficiary::new(row.address.trim(), share as u64, row.name.trim()))
            .collect())
    }

    fn parse_release(
        &self,
        config: &WillchainConfig,
        now: DateTime<Utc>,
    ) -> Result<i64, ValidationError> {
        let release = self.release.trim();
        if release.is_empty() {
            return Err(ValidationError::ReleaseTimeRequired);
        }
        let invalid = || ValidationError::InvalidReleaseTime(self.release.clone());

        let secs = if release.chars().all(|c| c.is_ascii_digit()) {
            release.parse::<i64>().map_err(|_| invalid())?
        } else {
            encode_epoch_seconds_in(release, config.zone).map_err(|_| invalid())?
        };
        instant_from_seconds(secs).map_err(|_| invalid())?;

        let earliest = now.timestamp().saturating_add(config.min_release_lead_secs);
        if secs <= earliest {
            return Err(ValidationError::ReleaseTimeNotInFuture);
        }
        Ok(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DisplayZone;
    use crate::normalizer::WillNormalizer;
    use crate::record::WillStatus;
    use chrono::TimeZone;

    fn config() -> WillchainConfig {
        WillchainConfig::default().with_zone(DisplayZone::Utc)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn form() -> WillForm {
        WillForm {
            will_id: "181".into(),
            asset_name: "House".into(),
            asset_category: "Real Estate".into(),
            release: "2024-12-31T12:00".into(),
            amount: String::new(),
            beneficiaries: vec![
                BeneficiaryFields::new("0xAAA", "Alice", "50"),
                BeneficiaryFields::new("0xBBB", "Bob", "50"),
            ],
        }
    }

    fn with_percentages(percentages: &[&str]) -> WillForm {
        let mut form = form();
        form.beneficiaries = percentages
            .iter()
            .enumerate()
            .map(|(i, p)| BeneficiaryFields::new(format!("0x{:03}", i), format!("B{}", i), *p))
            .collect();
        form
    }

    #[test]
    fn test_valid_form() {
        assert_eq!(form().validate_at(&config(), now()), Ok(()));

        let draft = form().to_draft_at(&config(), now()).unwrap();
        assert_eq!(draft.will_id, WillId::new(181));
        assert_eq!(draft.release_timestamp, 1_735_646_400);
        assert_eq!(draft.beneficiaries[1], Beneficiary::new("0xBBB", 50, "Bob"));
        assert_eq!(draft.deposit, None);
    }

    #[test]
    fn test_share_sum_must_be_exactly_100() {
        let c = config();
        assert_eq!(
            with_percentages(&["50", "49"]).validate_at(&c, now()),
            Err(ValidationError::ShareTotal { total: 99.0 })
        );
        assert_eq!(
            with_percentages(&["50", "51"]).validate_at(&c, now()),
            Err(ValidationError::ShareTotal { total: 101.0 })
        );
        assert_eq!(with_percentages(&["50", "25", "25"]).validate_at(&c, now()), Ok(()));
    }

    #[test]
    fn test_zero_beneficiaries_rejected() {
        let mut form = form();
        form.beneficiaries.clear();
        assert_eq!(form.validate_at(&config(), now()), Err(ValidationError::NoBeneficiaries));
    }

    #[test]
    fn test_first_failure_wins() {
        let mut form = form();
        form.asset_name.clear();
        form.release.clear();
        form.beneficiaries[0].name.clear();
        assert_eq!(form.validate_at(&config(), now()), Err(ValidationError::AssetNameRequired));

        form.asset_name = "House".into();
        assert_eq!(
            form.validate_at(&config(), now()),
            Err(ValidationError::IncompleteBeneficiary { index: 0 })
        );

        form.beneficiaries[0].name = "Alice".into();
        assert_eq!(form.validate_at(&config(), now()), Err(ValidationError::ReleaseTimeRequired));
    }

    #[test]
    fn test_message_matches_first_rule() {
        let mut form = form();
        form.beneficiaries[1].percentage.clear();
        let err = form.validate_at(&config(), now()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "All beneficiaries must have a name and a percentage allocation."
        );
    }

    #[test]
    fn test_percentage_rules() {
        let c = config();
        assert_eq!(
            with_percentages(&["abc", "50"]).validate_at(&c, now()),
            Err(ValidationError::InvalidShare { index: 0, value: "abc".into() })
        );
        assert_eq!(
            with_percentages(&["110", "-10"]).validate_at(&c, now()),
            Err(ValidationError::NonPositiveShare { index: 1 })
        );
        assert_eq!(
            with_percentages(&["33.5", "66.5"]).validate_at(&c, now()),
            Err(ValidationError::FractionalShare { index: 0 })
        );
    }

    #[test]
    fn test_missing_address() {
        let mut form = form();
        form.beneficiaries[1].address = "  ".into();
        assert_eq!(
            form.validate_at(&config(), now()),
            Err(ValidationError::MissingAddress { index: 1 })
        );
    }

    #[test]
    fn test_release_formats() {
        let c = config();
        let mut form = form();

        form.release = "1735646400".into();
        assert_eq!(form.to_draft_at(&c, now()).unwrap().release_timestamp, 1_735_646_400);

        form.release = "2024-12-31T12:00:30".into();
        assert_eq!(form.to_draft_at(&c, now()).unwrap().release_timestamp, 1_735_646_430);

        form.release = "someday".into();
        assert_eq!(
            form.validate_at(&c, now()),
            Err(ValidationError::InvalidReleaseTime("someday".into()))
        );

        form.release = "2023-06-01T00:00".into();
        assert_eq!(form.validate_at(&c, now()), Err(ValidationError::ReleaseTimeNotInFuture));
    }

    #[test]
    fn test_release_lead_time() {
        let c = config().with_min_release_lead_secs(24 * 3600);
        let mut form = form();
        form.release = "2024-01-01T12:00".into();
        assert_eq!(form.validate_at(&c, now()), Err(ValidationError::ReleaseTimeNotInFuture));

        form.release = "2024-01-02T12:00".into();
        assert_eq!(form.validate_at(&c, now()), Ok(()));
    }

    #[test]
    fn test_will_id_and_amount() {
        let c = config();
        let mut form = form();

        form.will_id = String::new();
        form.amount = "0.01".into();
        let draft = form.to_draft_at(&c, now()).unwrap();
        assert_eq!(draft.will_id, WillId::new(0));
        assert_eq!(draft.deposit, Some(Wei(10_000_000_000_000_000)));

        form.will_id = "-3".into();
        assert_eq!(form.validate_at(&c, now()), Err(ValidationError::InvalidWillId("-3".into())));

        form.will_id = "3".into();
        form.amount = "lots".into();
        assert_eq!(form.validate_at(&c, now()), Err(ValidationError::InvalidAmount("lots".into())));
    }

    #[test]
    fn test_rows() {
        let mut form = WillForm::new();
        assert_eq!(form.beneficiaries.len(), 1);
        form.add_beneficiary();
        form.beneficiaries[0].percentage = "60".into();
        form.beneficiaries[1].percentage = "15".into();
        assert_eq!(form.total_percentage(), 75.0);
        assert!(form.remove_beneficiary(1).is_some());
        assert!(form.remove_beneficiary(5).is_none());
        assert_eq!(form.total_percentage(), 60.0);
    }

    #[test]
    fn test_modify_flow_round_trip() {
        let c = config();
        let normalizer = WillNormalizer::new(c.clone());
        let draft = form().to_draft_at(&c, now()).unwrap();
        let payload = normalizer.encode(&draft).unwrap();

        let record = normalizer.decode_at(&payload.to_chain_struct(), now());
        assert_eq!(record.status, WillStatus::Active);

        let refilled = WillForm::from_record(&record);
        assert_eq!(refilled.release, "2024-12-31T12:00");
        assert_eq!(refilled.beneficiaries, form().beneficiaries);
        assert_eq!(refilled.to_draft_at(&c, now()).unwrap(), draft);
    }
}
