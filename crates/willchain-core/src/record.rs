//! Will records: the chain-shaped structs and the application view-model

use crate::beneficiary::{Beneficiary, BeneficiaryPayload, ChainBeneficiary};
use crate::decode::format_ether;
use crate::identity::WillId;
use crate::value::ChainValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display status of a will
///
/// Derived while decoding and never sent back to the chain; the contract owns
/// the authoritative state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WillStatus {
    /// Release time still ahead
    #[default]
    Active,
    /// Release time reached, awaiting verification
    Pending,
    /// Funds distributed
    Executed,
    /// Verified by the registrar
    Verified,
}

impl WillStatus {
    /// Label used in lists and filters
    pub fn label(&self) -> &'static str {
        match self {
            WillStatus::Active => "Active",
            WillStatus::Pending => "Pending",
            WillStatus::Executed => "Executed",
            WillStatus::Verified => "Verified",
        }
    }
}

impl fmt::Display for WillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw will struct as returned by a contract read
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChainWillStruct {
    #[serde(alias = "will-Id")]
    pub will_id: ChainValue,
    pub asset_name: Option<String>,
    pub asset_category: Option<String>,
    pub release_time: ChainValue,
    pub beneficiaries: Vec<ChainBeneficiary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

/// Canonical application-side view of one will
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WillRecord {
    pub will_id: WillId,
    pub asset_name: String,
    pub asset_category: String,
    /// Epoch seconds
    pub release_timestamp: i64,
    /// Release time as a datetime-input string in the configured zone
    pub release_display: String,
    /// Order matches the contract's parallel arrays
    pub beneficiaries: Vec<Beneficiary>,
    pub status: WillStatus,
    /// Set for wills the navigation layer must route to registrar review
    pub requires_registrar_review: bool,
}

impl WillRecord {
    /// Sum of all beneficiary shares
    pub fn total_share(&self) -> u64 {
        self.beneficiaries.iter().map(|b| b.share).sum()
    }

    /// Turn this record back into an editable draft
    pub fn to_draft(&self) -> WillRecordDraft {
        WillRecordDraft {
            will_id: self.will_id,
            asset_name: self.asset_name.clone(),
            asset_category: self.asset_category.clone(),
            release_timestamp: self.release_timestamp,
            beneficiaries: self.beneficiaries.clone(),
            deposit: None,
        }
    }
}

/// A will being created or modified, before encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WillRecordDraft {
    pub will_id: WillId,
    pub asset_name: String,
    pub asset_category: String,
    /// Epoch seconds
    pub release_timestamp: i64,
    pub beneficiaries: Vec<Beneficiary>,
    /// Value sent along with a create call
    pub deposit: Option<Wei>,
}

impl WillRecordDraft {
    /// Create a draft with no beneficiaries
    pub fn new(
        will_id: impl Into<WillId>,
        asset_name: impl Into<String>,
        asset_category: impl Into<String>,
        release_timestamp: i64,
    ) -> Self {
        Self {
            will_id: will_id.into(),
            asset_name: asset_name.into(),
            asset_category: asset_category.into(),
            release_timestamp,
            beneficiaries: Vec::new(),
            deposit: None,
        }
    }

    /// Add a beneficiary
    pub fn with_beneficiary(mut self, beneficiary: Beneficiary) -> Self {
        self.beneficiaries.push(beneficiary);
        self
    }

    /// Set the value sent with a create call
    pub fn with_deposit(mut self, deposit: Wei) -> Self {
        self.deposit = Some(deposit);
        self
    }
}

/// Amount in wei
///
/// Serialized as a decimal string since it rarely fits in a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Wei(pub u128);

impl Wei {
    /// Get the raw amount
    pub fn raw(&self) -> u128 {
        self.0
    }

    /// Render as a decimal ether amount
    pub fn to_ether_string(&self) -> String {
        format_ether(self.0)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}

impl From<Wei> for String {
    fn from(wei: Wei) -> Self {
        wei.0.to_string()
    }
}

impl TryFrom<String> for Wei {
    type Error = std::num::ParseIntError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.trim().parse().map(Wei)
    }
}

/// Validated arguments for a contract write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainWritePayload {
    pub will_id: u64,
    pub addresses: Vec<String>,
    pub shares: Vec<u64>,
    pub names: Vec<String>,
    /// Epoch seconds
    pub release_time: i64,
    pub asset_name: String,
    pub asset_category: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deposit: Option<Wei>,
}

impl ChainWritePayload {
    /// The beneficiary arrays as the contract's `beneficiaryData` argument
    pub fn beneficiary_data(&self) -> BeneficiaryPayload {
        BeneficiaryPayload {
            addresses: self.addresses.clone(),
            shares: self.shares.clone(),
            names: self.names.clone(),
        }
    }

    /// Rebuild the struct a contract read would return for this payload
    ///
    /// Ids, shares and the release time come back hex-encoded.
    pub fn to_chain_struct(&self) -> ChainWillStruct {
        let beneficiaries = self
            .addresses
            .iter()
            .zip(&self.shares)
            .zip(&self.names)
            .map(|((address, share), name)| {
                let share = ChainValue::hex(u128::from(*share));
                ChainBeneficiary::new(address.clone(), share, name.clone())
            })
            .collect();

        ChainWillStruct {
            will_id: ChainValue::hex(u128::from(self.will_id)),
            asset_name: Some(self.asset_name.clone()),
            asset_category: Some(self.asset_category.clone()),
            release_time: ChainValue::hex(self.release_time.max(0) as u128),
            beneficiaries,
            executed: None,
            verified: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> ChainWritePayload {
        ChainWritePayload {
            will_id: 181,
            addresses: vec!["0xAAA".into(), "0xBBB".into()],
            shares: vec![50, 50],
            names: vec!["Alice".into(), "Bob".into()],
            release_time: 1_702_949_120,
            asset_name: "House".into(),
            asset_category: "Real Estate".into(),
            deposit: Some(Wei(10_000_000_000_000_000)),
        }
    }

    #[test]
    fn test_chain_struct_deserialize() {
        let raw: ChainWillStruct = serde_json::from_str(
            r#"{
                "willId": "0xb5",
                "assetName": "House",
                "assetCategory": "Real Estate",
                "releaseTime": "0x6580f100",
                "beneficiaries": [["0xAAA", "0x32", null, "Alice"]]
            }"#,
        )
        .unwrap();

        assert_eq!(raw.will_id, ChainValue::from("0xb5"));
        assert_eq!(raw.asset_name.as_deref(), Some("House"));
        assert_eq!(raw.beneficiaries.len(), 1);
        assert_eq!(raw.executed, None);
    }

    #[test]
    fn test_chain_struct_legacy_id_key_and_missing_fields() {
        let raw: ChainWillStruct = serde_json::from_str(r#"{"will-Id": 189}"#).unwrap();
        assert_eq!(raw.will_id, ChainValue::Int(189));
        assert_eq!(raw.asset_name, None);
        assert!(raw.release_time.is_null());
        assert!(raw.beneficiaries.is_empty());
    }

    #[test]
    fn test_payload_to_chain_struct() {
        let raw = sample_payload().to_chain_struct();
        assert_eq!(raw.will_id, ChainValue::from("0xb5"));
        assert_eq!(raw.release_time, ChainValue::from("0x6580f100"));
        assert_eq!(raw.beneficiaries[1].share, ChainValue::from("0x32"));
        assert_eq!(raw.beneficiaries[1].name, ChainValue::from("Bob"));
    }

    #[test]
    fn test_payload_json_shape() {
        let json = serde_json::to_value(sample_payload()).unwrap();
        assert_eq!(json["willId"], 181);
        assert_eq!(json["releaseTime"], 1_702_949_120);
        assert_eq!(json["assetCategory"], "Real Estate");
        assert_eq!(json["deposit"], "10000000000000000");

        let back: ChainWritePayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample_payload());
    }

    #[test]
    fn test_beneficiary_data() {
        let data = sample_payload().beneficiary_data();
        assert_eq!(data.names, vec!["Alice", "Bob"]);
        assert_eq!(data.total_share(), 100);
    }

    #[test]
    fn test_wei() {
        let wei = Wei(10_000_000_000_000_000);
        assert_eq!(wei.to_ether_string(), "0.01");
        assert_eq!(format!("{}", wei), "10000000000000000 wei");
        assert!(Wei::try_from("abc".to_string()).is_err());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(WillStatus::default(), WillStatus::Active);
        assert_eq!(WillStatus::Verified.to_string(), "Verified");
    }
}
