//! Beneficiary list mapper
//!
//! Contract reads return each beneficiary as a positional tuple
//! `(address, share, reserved, name)`; contract writes take three parallel
//! arrays. Both directions keep the input order, so index `i` names the same
//! person everywhere.

use crate::decode::decode_share;
use crate::error::ValidationError;
use crate::identity::Address;
use crate::value::ChainValue;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A party entitled to a percentage of a will's asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    /// Chain account receiving the share
    pub address: Address,
    /// Whole-percent allocation
    pub share: u64,
    /// Display label, independent of the on-chain identity
    pub name: String,
}

impl Beneficiary {
    /// Create a new beneficiary
    pub fn new(address: impl Into<Address>, share: u64, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            share,
            name: name.into(),
        }
    }
}

/// Positional beneficiary tuple as read from the contract
///
/// Deserializes from an array of any length; missing slots read as null.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ChainValue>", into = "Vec<ChainValue>")]
pub struct ChainBeneficiary {
    pub address: ChainValue,
    pub share: ChainValue,
    /// Unused slot kept for positional fidelity
    pub reserved: ChainValue,
    pub name: ChainValue,
}

impl ChainBeneficiary {
    /// Build a tuple the way a contract read would return it
    pub fn new(address: impl Into<String>, share: ChainValue, name: impl Into<String>) -> Self {
        Self {
            address: ChainValue::Text(address.into()),
            share,
            reserved: ChainValue::Null,
            name: ChainValue::Text(name.into()),
        }
    }
}

impl From<Vec<ChainValue>> for ChainBeneficiary {
    fn from(values: Vec<ChainValue>) -> Self {
        let mut slots = values.into_iter();
        Self {
            address: slots.next().unwrap_or_default(),
            share: slots.next().unwrap_or_default(),
            reserved: slots.next().unwrap_or_default(),
            name: slots.next().unwrap_or_default(),
        }
    }
}

impl From<ChainBeneficiary> for Vec<ChainValue> {
    fn from(tuple: ChainBeneficiary) -> Self {
        vec![tuple.address, tuple.share, tuple.reserved, tuple.name]
    }
}

/// The three parallel arrays a contract write expects
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BeneficiaryPayload {
    pub addresses: Vec<String>,
    pub shares: Vec<u64>,
    pub names: Vec<String>,
}

impl BeneficiaryPayload {
    /// Number of beneficiaries described
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// True if no beneficiaries are described
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Sum of all shares
    pub fn total_share(&self) -> u64 {
        self.shares.iter().sum()
    }
}

/// Map positional chain tuples to beneficiaries, preserving order
///
/// Never fails. A share that cannot be decoded becomes 0 and a non-text
/// address or name becomes an empty string, each with a warning, so one bad
/// tuple does not hide the rest of the will.
pub fn from_chain_tuples(tuples: &[ChainBeneficiary]) -> Vec<Beneficiary> {
    map_chain_tuples(tuples, true)
}

pub(crate) fn map_chain_tuples(
    tuples: &[ChainBeneficiary],
    warn_on_fallback: bool,
) -> Vec<Beneficiary> {
    tuples
        .iter()
        .enumerate()
        .map(|(index, tuple)| {
            let share = decode_share(&tuple.share).unwrap_or_else(|err| {
                if warn_on_fallback {
                    warn!(index, %err, "undecodable beneficiary share, using 0");
                }
                0
            });
            Beneficiary {
                address: Address::new(text_slot(
                    &tuple.address,
                    index,
                    "address",
                    warn_on_fallback,
                )),
                share,
                name: text_slot(&tuple.name, index, "name", warn_on_fallback),
            }
        })
        .collect()
}

fn text_slot(
    value: &ChainValue,
    index: usize,
    slot: &'static str,
    warn_on_fallback: bool,
) -> String {
    match value {
        ChainValue::Text(s) => s.clone(),
        ChainValue::Null => String::new(),
        other => {
            if warn_on_fallback {
                warn!(
                    index,
                    slot,
                    kind = other.type_name(),
                    "non-text beneficiary field, using empty string"
                );
            }
            String::new()
        }
    }
}

/// Project beneficiaries into parallel address/share/name arrays
///
/// Fails on the first beneficiary missing an address or a name, or holding a
/// zero share. The share total is checked by the normalizer.
pub fn to_write_payload(
    beneficiaries: &[Beneficiary],
) -> Result<BeneficiaryPayload, ValidationError> {
    let mut payload = BeneficiaryPayload {
        addresses: Vec::with_capacity(beneficiaries.len()),
        shares: Vec::with_capacity(beneficiaries.len()),
        names: Vec::with_capacity(beneficiaries.len()),
    };

    for (index, beneficiary) in beneficiaries.iter().enumerate() {
        if beneficiary.address.is_empty() {
            return Err(ValidationError::MissingAddress { index });
        }
        if beneficiary.name.trim().is_empty() {
            return Err(ValidationError::MissingName { index });
        }
        if beneficiary.share == 0 {
            return Err(ValidationError::NonPositiveShare { index });
        }
        payload.addresses.push(beneficiary.address.as_str().trim().to_string());
        payload.shares.push(beneficiary.share);
        payload.names.push(beneficiary.name.trim().to_string());
    }

    Ok(payload)
}
