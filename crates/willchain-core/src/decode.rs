//! Chain value decoder
//!
//! Conversions between chain-native encodings and application types:
//! - hex big-number strings to integers (`decode_hex_int`, `decode_chain_int`)
//! - epoch seconds to a datetime-input string and back
//!   (`decode_epoch_seconds`, `encode_epoch_seconds`)
//! - decimal ether amounts to wei and back (`parse_ether`, `format_ether`)
//!
//! Chain timestamps are epoch seconds. Display happens at minute precision,
//! the granularity of a `datetime-local` form input.

use crate::error::DecodeError;
use crate::value::{has_hex_prefix, ChainValue};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format used for displayed release times
pub const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const DATETIME_INPUT_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Wei per ether
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

const ETHER_DECIMALS: usize = 18;

/// Parse a hex string (optionally `0x` prefixed) into an integer
///
/// Absent or empty input decodes to 0, as do bare `0x` prefixes; optional
/// chain fields come through that way.
///
/// # Example
///
/// ```
/// use willchain_core::decode_hex_int;
///
/// assert_eq!(decode_hex_int(Some("0xb5")).unwrap(), 181);
/// assert_eq!(decode_hex_int(Some("ff")).unwrap(), 255);
/// assert_eq!(decode_hex_int(None).unwrap(), 0);
/// assert!(decode_hex_int(Some("not-hex")).is_err());
/// ```
pub fn decode_hex_int(hex: Option<&str>) -> Result<u128, DecodeError> {
    let Some(raw) = hex else {
        return Ok(0);
    };
    let trimmed = raw.trim();
    let digits = if has_hex_prefix(trimmed) {
        &trimmed[2..]
    } else {
        trimmed
    };
    if digits.is_empty() {
        return Ok(0);
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidHex(raw.to_string()));
    }
    u128::from_str_radix(digits, 16).map_err(|_| DecodeError::Overflow(raw.to_string()))
}

/// Decode any chain value shape into an integer
///
/// Strings are read as hex, whether or not they carry a prefix. Null decodes
/// to 0.
pub fn decode_chain_int(value: &ChainValue) -> Result<u128, DecodeError> {
    match value {
        ChainValue::Null => Ok(0),
        ChainValue::Int(i) => Ok(u128::from(*i)),
        ChainValue::Float(f) => float_to_int(*f),
        ChainValue::Text(s) => decode_hex_int(Some(s)),
        ChainValue::BigNumber { hex } => decode_hex_int(Some(hex)),
        ChainValue::Bool(_) => Err(DecodeError::NotAnInteger(value.to_string())),
    }
}

/// Decode a beneficiary share
///
/// Hex-encoded values go through [`decode_hex_int`]; anything else is taken
/// as a plain number, so unprefixed strings are decimal here.
pub fn decode_share(value: &ChainValue) -> Result<u64, DecodeError> {
    let share = match value {
        ChainValue::Text(s) if !value.is_hex_encoded() => {
            let s = s.trim();
            if s.is_empty() {
                0
            } else {
                s.parse::<u128>()
                    .map_err(|_| DecodeError::NotAnInteger(s.to_string()))?
            }
        }
        other => decode_chain_int(other)?,
    };
    u64::try_from(share).map_err(|_| DecodeError::Overflow(share.to_string()))
}

fn float_to_int(f: f64) -> Result<u128, DecodeError> {
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u128::MAX as f64 {
        Ok(f as u128)
    } else {
        Err(DecodeError::NotAnInteger(f.to_string()))
    }
}

/// Timezone in which release times are shown and entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DisplayZone {
    /// The host's local timezone
    #[default]
    Local,
    /// UTC
    Utc,
    /// A fixed offset east of UTC
    Fixed { offset_secs: i32 },
}

impl DisplayZone {
    /// Render an instant as a datetime-input string in this zone
    pub fn render(&self, instant: DateTime<Utc>) -> String {
        match self {
            DisplayZone::Local => render_in(&Local, instant),
            DisplayZone::Utc => render_in(&Utc, instant),
            DisplayZone::Fixed { offset_secs } => match FixedOffset::east_opt(*offset_secs) {
                Some(offset) => render_in(&offset, instant),
                None => render_in(&Utc, instant),
            },
        }
    }

    /// Parse a datetime-input string as a wall-clock time in this zone
    pub fn parse(&self, input: &str) -> Result<i64, DecodeError> {
        match self {
            DisplayZone::Local => parse_in(&Local, input),
            DisplayZone::Utc => parse_in(&Utc, input),
            DisplayZone::Fixed { offset_secs } => {
                let offset = FixedOffset::east_opt(*offset_secs)
                    .ok_or_else(|| DecodeError::InvalidDateTime(input.to_string()))?;
                parse_in(&offset, input)
            }
        }
    }
}

impl fmt::Display for DisplayZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayZone::Local => write!(f, "local"),
            DisplayZone::Utc => write!(f, "UTC"),
            DisplayZone::Fixed { offset_secs } => write!(f, "UTC{:+}s", offset_secs),
        }
    }
}

fn render_in<Tz: TimeZone>(tz: &Tz, instant: DateTime<Utc>) -> String
where
    Tz::Offset: fmt::Display,
{
    instant
        .with_timezone(tz)
        .format(DATETIME_INPUT_FORMAT)
        .to_string()
}

fn parse_in<Tz: TimeZone>(tz: &Tz, input: &str) -> Result<i64, DecodeError> {
    let input = input.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(input) {
        return Ok(with_offset.timestamp());
    }
    let naive = DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .ok_or_else(|| DecodeError::InvalidDateTime(input.to_string()))?;
    // Wall-clock times skipped by a DST jump have no instant
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| DecodeError::InvalidDateTime(input.to_string()))
}

/// Decode a chain timestamp into epoch seconds
///
/// Fails when the value is not an integer or does not name a calendar date
/// once scaled to milliseconds.
pub fn epoch_seconds(value: &ChainValue) -> Result<i64, DecodeError> {
    let secs = decode_chain_int(value)?;
    let millis = secs
        .checked_mul(1000)
        .and_then(|ms| i64::try_from(ms).ok())
        .ok_or(DecodeError::TimestampOutOfRange(secs as i128))?;
    let instant = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or(DecodeError::TimestampOutOfRange(secs as i128))?;
    Ok(instant.timestamp())
}

/// Convert epoch seconds into an instant
pub fn instant_from_seconds(secs: i64) -> Result<DateTime<Utc>, DecodeError> {
    DateTime::<Utc>::from_timestamp(secs, 0).ok_or(DecodeError::TimestampOutOfRange(secs as i128))
}

/// Render a chain timestamp as a datetime-input string in the host timezone
///
/// Falls back to the current time when the value cannot be decoded.
pub fn decode_epoch_seconds(value: &ChainValue) -> String {
    decode_epoch_seconds_at(value, DisplayZone::Local, Utc::now())
}

/// Render a chain timestamp in `zone`, falling back to `now`
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use willchain_core::{decode_epoch_seconds_at, ChainValue, DisplayZone};
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let shown = decode_epoch_seconds_at(&ChainValue::from("0x6580f100"), DisplayZone::Utc, now);
/// assert_eq!(shown, "2023-12-19T01:25");
///
/// let fallback = decode_epoch_seconds_at(&ChainValue::from("not-hex"), DisplayZone::Utc, now);
/// assert_eq!(fallback, "2024-01-01T00:00");
/// ```
pub fn decode_epoch_seconds_at(
    value: &ChainValue,
    zone: DisplayZone,
    now: DateTime<Utc>,
) -> String {
    let instant = epoch_seconds(value)
        .and_then(instant_from_seconds)
        .unwrap_or(now);
    zone.render(instant)
}

/// Parse a datetime-input string in the host timezone into epoch seconds
pub fn encode_epoch_seconds(input: &str) -> Result<i64, DecodeError> {
    encode_epoch_seconds_in(input, DisplayZone::Local)
}

/// Parse a datetime-input string in `zone` into epoch seconds
///
/// Accepts `YYYY-MM-DDTHH:MM`, an optional `:SS`, or a full RFC 3339 string
/// (whose own offset wins over `zone`). Sub-second parts are floored away.
pub fn encode_epoch_seconds_in(input: &str, zone: DisplayZone) -> Result<i64, DecodeError> {
    zone.parse(input)
}

/// Parse a decimal ether amount into wei
///
/// No rounding: more than 18 fractional digits is an error.
///
/// # Example
///
/// ```
/// use willchain_core::parse_ether;
///
/// assert_eq!(parse_ether("0.01").unwrap(), 10_000_000_000_000_000);
/// assert_eq!(parse_ether("2").unwrap(), 2_000_000_000_000_000_000);
/// assert!(parse_ether("1.2.3").is_err());
/// ```
pub fn parse_ether(amount: &str) -> Result<u128, DecodeError> {
    let invalid = || DecodeError::InvalidEtherAmount(amount.to_string());
    let trimmed = amount.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) || fraction.len() > ETHER_DECIMALS {
        return Err(invalid());
    }

    let whole_wei = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .ok()
            .and_then(|w| w.checked_mul(WEI_PER_ETHER))
            .ok_or_else(invalid)?
    };
    let fraction_wei = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = ETHER_DECIMALS);
        padded.parse::<u128>().map_err(|_| invalid())?
    };
    whole_wei.checked_add(fraction_wei).ok_or_else(invalid)
}

/// Format wei as a decimal ether amount without trailing zeros
pub fn format_ether(wei: u128) -> String {
    let whole = wei / WEI_PER_ETHER;
    let fraction = wei % WEI_PER_ETHER;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0>width$}", fraction, width = ETHER_DECIMALS);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_year() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_decode_hex_int() {
        assert_eq!(decode_hex_int(Some("0xb5")).unwrap(), 181);
        assert_eq!(decode_hex_int(Some("0XB5")).unwrap(), 181);
        assert_eq!(decode_hex_int(Some("b5")).unwrap(), 181);
        assert_eq!(decode_hex_int(Some("0x6580f100")).unwrap(), 1_702_949_120);
        assert_eq!(decode_hex_int(Some("  0x32 ")).unwrap(), 50);
    }

    #[test]
    fn test_decode_hex_int_absent() {
        assert_eq!(decode_hex_int(None).unwrap(), 0);
        assert_eq!(decode_hex_int(Some("")).unwrap(), 0);
        assert_eq!(decode_hex_int(Some("0x")).unwrap(), 0);
    }

    #[test]
    fn test_decode_hex_int_rejects_garbage() {
        assert!(matches!(
            decode_hex_int(Some("not-hex")),
            Err(DecodeError::InvalidHex(_))
        ));
        assert!(matches!(
            decode_hex_int(Some("0x-1")),
            Err(DecodeError::InvalidHex(_))
        ));
        let too_wide = format!("0x1{}", "0".repeat(32));
        assert!(matches!(
            decode_hex_int(Some(&too_wide)),
            Err(DecodeError::Overflow(_))
        ));
    }

    #[test]
    fn test_decode_chain_int_shapes() {
        assert_eq!(decode_chain_int(&ChainValue::Null).unwrap(), 0);
        assert_eq!(decode_chain_int(&ChainValue::Int(7)).unwrap(), 7);
        assert_eq!(decode_chain_int(&ChainValue::Float(7.0)).unwrap(), 7);
        assert_eq!(decode_chain_int(&ChainValue::big_number(181)).unwrap(), 181);
        assert!(decode_chain_int(&ChainValue::Float(7.5)).is_err());
        assert!(decode_chain_int(&ChainValue::Float(-1.0)).is_err());
        assert!(decode_chain_int(&ChainValue::Bool(true)).is_err());
    }

    #[test]
    fn test_decode_share() {
        assert_eq!(decode_share(&ChainValue::from("0x32")).unwrap(), 50);
        assert_eq!(decode_share(&ChainValue::from("50")).unwrap(), 50);
        assert_eq!(decode_share(&ChainValue::Int(25)).unwrap(), 25);
        assert_eq!(decode_share(&ChainValue::Null).unwrap(), 0);
        assert!(decode_share(&ChainValue::from("fifty")).is_err());
    }

    #[test]
    fn test_epoch_seconds() {
        assert_eq!(
            epoch_seconds(&ChainValue::from("0x6580f100")).unwrap(),
            1_702_949_120
        );
        assert_eq!(epoch_seconds(&ChainValue::Int(0)).unwrap(), 0);
        assert!(matches!(
            epoch_seconds(&ChainValue::Int(u64::MAX)),
            Err(DecodeError::TimestampOutOfRange(_))
        ));
    }

    #[test]
    fn test_decode_epoch_seconds_truncates_to_minutes() {
        // 2023-12-19T01:31:59Z
        let value = ChainValue::Int(1_702_949_519);
        assert_eq!(
            decode_epoch_seconds_at(&value, DisplayZone::Utc, new_year()),
            "2023-12-19T01:31"
        );
    }

    #[test]
    fn test_decode_epoch_seconds_fixed_zone() {
        let value = ChainValue::from("0x6580f100");
        let zone = DisplayZone::Fixed { offset_secs: 2 * 3600 };
        assert_eq!(
            decode_epoch_seconds_at(&value, zone, new_year()),
            "2023-12-19T03:25"
        );
    }

    #[test]
    fn test_decode_epoch_seconds_falls_back_to_now() {
        let shown =
            decode_epoch_seconds_at(&ChainValue::from("not-hex"), DisplayZone::Utc, new_year());
        assert_eq!(shown, "2024-01-01T00:00");

        let shown =
            decode_epoch_seconds_at(&ChainValue::Int(u64::MAX), DisplayZone::Utc, new_year());
        assert_eq!(shown, "2024-01-01T00:00");
    }

    #[test]
    fn test_encode_epoch_seconds() {
        assert_eq!(
            encode_epoch_seconds_in("2023-12-19T01:31", DisplayZone::Utc).unwrap(),
            1_702_949_460
        );
        assert_eq!(
            encode_epoch_seconds_in("2023-12-19T01:31:59", DisplayZone::Utc).unwrap(),
            1_702_949_519
        );
        assert_eq!(
            encode_epoch_seconds_in("2023-12-19T03:31", DisplayZone::Fixed { offset_secs: 7200 })
                .unwrap(),
            1_702_949_460
        );
        // Explicit offsets win over the zone
        assert_eq!(
            encode_epoch_seconds_in("2023-12-19T01:31:00.750Z", DisplayZone::Local).unwrap(),
            1_702_949_460
        );
        assert!(encode_epoch_seconds_in("next tuesday", DisplayZone::Utc).is_err());
    }

    #[test]
    fn test_local_round_trip() {
        let value = ChainValue::Int(1_702_949_460);
        let shown = decode_epoch_seconds(&value);
        assert_eq!(encode_epoch_seconds(&shown).unwrap(), 1_702_949_460);
    }

    #[test]
    fn test_parse_ether() {
        assert_eq!(parse_ether("0.01").unwrap(), 10_000_000_000_000_000);
        assert_eq!(parse_ether("1").unwrap(), WEI_PER_ETHER);
        assert_eq!(parse_ether(".5").unwrap(), WEI_PER_ETHER / 2);
        assert_eq!(parse_ether("3.").unwrap(), 3 * WEI_PER_ETHER);
        assert_eq!(parse_ether("0.000000000000000001").unwrap(), 1);
        assert!(parse_ether("0.0000000000000000001").is_err());
        assert!(parse_ether("").is_err());
        assert!(parse_ether(".").is_err());
        assert!(parse_ether("-1").is_err());
        assert!(parse_ether("1e18").is_err());
    }

    #[test]
    fn test_format_ether() {
        assert_eq!(format_ether(0), "0");
        assert_eq!(format_ether(WEI_PER_ETHER), "1");
        assert_eq!(format_ether(10_000_000_000_000_000), "0.01");
        assert_eq!(format_ether(1), "0.000000000000000001");
        assert_eq!(format_ether(parse_ether("12.345").unwrap()), "12.345");
    }
}
