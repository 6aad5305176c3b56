//! Normalizer configuration
//!
//! Settings that shape how raw wills are decoded and how forms are checked.
//! Usually loaded from a RON file:
//!
//! ```ron
//! (
//!     registrar_review_ids: [189],
//!     zone: Utc,
//!     warn_on_decode_fallback: true,
//!     min_release_lead_secs: 3600,
//! )
//! ```

use crate::decode::DisplayZone;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Will id the registrar view has historically been keyed on
pub const DEFAULT_REGISTRAR_REVIEW_ID: u64 = 189;

const MAX_OFFSET_SECS: i32 = 24 * 3600;

/// Configuration for decoding and validating wills
///
/// # Example
///
/// ```
/// use willchain_core::{DisplayZone, WillchainConfig};
///
/// let config = WillchainConfig::default();
/// assert!(config.requires_registrar_review(189));
/// assert_eq!(config.zone, DisplayZone::Local);
///
/// let config = WillchainConfig::from_ron_str("(zone: Utc, registrar_review_ids: [7])").unwrap();
/// assert!(config.requires_registrar_review(7));
/// assert!(!config.requires_registrar_review(189));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WillchainConfig {
    /// Will ids whose records need the registrar review view
    pub registrar_review_ids: Vec<u64>,
    /// Timezone for displaying and entering release times
    pub zone: DisplayZone,
    /// Log a warning whenever a decoded field falls back to its default
    pub warn_on_decode_fallback: bool,
    /// How far ahead of now a form's release time must be, in seconds
    pub min_release_lead_secs: i64,
}

impl WillchainConfig {
    /// Parse and validate a configuration from a RON string
    pub fn from_ron_str(content: &str) -> Result<Self> {
        let config: WillchainConfig = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a RON file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Check that the settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.min_release_lead_secs < 0 {
            return Err(Error::InvalidConfig(format!(
                "min_release_lead_secs must not be negative, got {}",
                self.min_release_lead_secs
            )));
        }
        if let DisplayZone::Fixed { offset_secs } = self.zone {
            if offset_secs.abs() >= MAX_OFFSET_SECS {
                return Err(Error::InvalidConfig(format!(
                    "zone offset must be within one day, got {}s",
                    offset_secs
                )));
            }
        }
        Ok(())
    }

    /// Check if a will id needs the registrar review view
    pub fn requires_registrar_review(&self, will_id: u64) -> bool {
        self.registrar_review_ids.contains(&will_id)
    }

    /// Set the display zone
    pub fn with_zone(mut self, zone: DisplayZone) -> Self {
        self.zone = zone;
        self
    }

    /// Set the minimum release lead time
    pub fn with_min_release_lead_secs(mut self, secs: i64) -> Self {
        self.min_release_lead_secs = secs;
        self
    }
}

impl Default for WillchainConfig {
    fn default() -> Self {
        Self {
            registrar_review_ids: vec![DEFAULT_REGISTRAR_REVIEW_ID],
            zone: DisplayZone::Local,
            warn_on_decode_fallback: true,
            min_release_lead_secs: 0,
        }
    }
}
