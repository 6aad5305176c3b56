//! Decoded will lists and queries over them

use crate::identity::WillId;
use crate::record::{WillRecord, WillStatus};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered list of decoded wills, unique by id
///
/// Keeps the order the contract returned them in. Records whose id could not
/// be decoded are kept as they come and never replace one another.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WillBook {
    records: Vec<WillRecord>,
    /// Position in `records` of every record with a decoded id
    #[serde(skip)]
    index: IndexMap<WillId, usize>,
}

impl WillBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any record with the same id in place
    pub fn insert(&mut self, record: WillRecord) -> Option<WillRecord> {
        match self.index.get(&record.will_id) {
            Some(&position) => Some(std::mem::replace(&mut self.records[position], record)),
            None => {
                self.index.insert(record.will_id, self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    /// Append a record whose id is a decode fallback, without indexing it
    pub(crate) fn push_unkeyed(&mut self, record: WillRecord) {
        self.records.push(record);
    }

    /// Get a record by id
    pub fn get(&self, id: WillId) -> Option<&WillRecord> {
        self.index.get(&id).map(|&position| &self.records[position])
    }

    /// Remove a record, keeping the order of the rest
    pub fn remove(&mut self, id: WillId) -> Option<WillRecord> {
        let position = self.index.shift_remove(&id)?;
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(self.records.remove(position))
    }

    /// Number of wills
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the book holds no wills
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in contract order
    pub fn iter(&self) -> impl Iterator<Item = &WillRecord> {
        self.records.iter()
    }

    /// True if any will has to be routed to registrar review
    pub fn requires_registrar_review(&self) -> bool {
        self.iter().any(|will| will.requires_registrar_review)
    }

    /// Count wills by status
    pub fn count_by_status(&self, status: WillStatus) -> usize {
        self.iter().filter(|will| will.status == status).count()
    }

    /// Run a query over the book
    pub fn query(&self, query: &WillQuery) -> Vec<&WillRecord> {
        let mut matches: Vec<&WillRecord> =
            self.iter().filter(|will| query.matches(will)).collect();
        match query.sort {
            SortOrder::Recent => matches.sort_by(|a, b| b.will_id.cmp(&a.will_id)),
            SortOrder::Oldest => matches.sort_by(|a, b| a.will_id.cmp(&b.will_id)),
            SortOrder::Contract => {}
        }
        matches
    }
}

impl FromIterator<WillRecord> for WillBook {
    fn from_iter<I: IntoIterator<Item = WillRecord>>(iter: I) -> Self {
        let mut book = WillBook::new();
        for record in iter {
            book.insert(record);
        }
        book
    }
}

impl IntoIterator for WillBook {
    type Item = WillRecord;
    type IntoIter = std::vec::IntoIter<WillRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Ordering of query results
///
/// Will ids are assigned at creation, so a higher id is a newer will.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortOrder {
    /// Newest first
    #[default]
    Recent,
    /// Oldest first
    Oldest,
    /// As returned by the contract
    Contract,
}

/// Filter for will lists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WillQuery {
    /// Case-insensitive text matched against id, asset, category and beneficiary names
    pub search: Option<String>,
    /// Only wills with this status
    pub status: Option<WillStatus>,
    pub sort: SortOrder,
}

impl WillQuery {
    /// Create a query matching everything, newest first
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text; blank text matches everything
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search.trim().to_lowercase())
        };
        self
    }

    /// Only match wills with the given status
    pub fn with_status(mut self, status: WillStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the sort order
    pub fn sorted(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Check whether a record passes the filter
    pub fn matches(&self, will: &WillRecord) -> bool {
        if let Some(status) = self.status {
            if will.status != status {
                return false;
            }
        }
        let Some(needle) = &self.search else {
            return true;
        };
        let needle = needle.to_lowercase();
        will.will_id.raw().to_string().contains(&needle)
            || will.asset_name.to_lowercase().contains(&needle)
            || will.asset_category.to_lowercase().contains(&needle)
            || will
                .beneficiaries
                .iter()
                .any(|b| b.name.to_lowercase().contains(&needle))
    }
}
