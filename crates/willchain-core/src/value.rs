//! Dynamic values as returned by contract reads

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single field of a raw contract-read result
///
/// Contract bindings hand back numbers in several shapes depending on the
/// library and on how the result was serialized: plain JSON numbers, hex or
/// decimal strings, or big-number wrapper objects. All of them deserialize
/// into this type; [`crate::decode`] turns them into native integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum ChainValue {
    /// Absent field
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Unsigned integer that fit in a JSON number
    Int(u64),
    /// Any other JSON number
    Float(f64),
    /// String: hex (`0x` prefixed), decimal digits, or plain text
    Text(String),
    /// Big-number wrapper object (`{"_hex": "0x.."}` or `{"type": "BigNumber", "hex": "0x.."}`)
    BigNumber {
        #[serde(rename = "_hex", alias = "hex")]
        hex: String,
    },
}

impl ChainValue {
    /// Wrap a hex string as a big-number object
    pub fn big_number(value: u128) -> Self {
        ChainValue::BigNumber {
            hex: format!("{:#x}", value),
        }
    }

    /// Encode an integer as a `0x` prefixed hex string
    pub fn hex(value: u128) -> Self {
        ChainValue::Text(format!("{:#x}", value))
    }

    /// Check if this value is absent
    pub fn is_null(&self) -> bool {
        matches!(self, ChainValue::Null)
    }

    /// Try to get this value as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ChainValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this value carries a hex encoding
    pub fn is_hex_encoded(&self) -> bool {
        match self {
            ChainValue::BigNumber { .. } => true,
            ChainValue::Text(s) => has_hex_prefix(s.trim()),
            _ => false,
        }
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            ChainValue::Null => "null",
            ChainValue::Bool(_) => "bool",
            ChainValue::Int(_) => "int",
            ChainValue::Float(_) => "float",
            ChainValue::Text(_) => "text",
            ChainValue::BigNumber { .. } => "big_number",
        }
    }
}

pub(crate) fn has_hex_prefix(s: &str) -> bool {
    s.starts_with("0x") || s.starts_with("0X")
}

impl fmt::Display for ChainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainValue::Null => write!(f, "null"),
            ChainValue::Bool(b) => write!(f, "{}", b),
            ChainValue::Int(i) => write!(f, "{}", i),
            ChainValue::Float(fl) => write!(f, "{}", fl),
            ChainValue::Text(s) => write!(f, "\"{}\"", s),
            ChainValue::BigNumber { hex } => write!(f, "BigNumber({})", hex),
        }
    }
}

impl From<u64> for ChainValue {
    fn from(i: u64) -> Self {
        ChainValue::Int(i)
    }
}

impl From<f64> for ChainValue {
    fn from(f: f64) -> Self {
        ChainValue::Float(f)
    }
}

impl From<bool> for ChainValue {
    fn from(b: bool) -> Self {
        ChainValue::Bool(b)
    }
}

impl From<String> for ChainValue {
    fn from(s: String) -> Self {
        ChainValue::Text(s)
    }
}

impl From<&str> for ChainValue {
    fn from(s: &str) -> Self {
        ChainValue::Text(s.to_string())
    }
}

impl<T: Into<ChainValue>> From<Option<T>> for ChainValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ChainValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_shapes() {
        let values: Vec<ChainValue> = serde_json::from_str(
            r#"[null, true, 50, 12.5, "0x32", {"_hex": "0xb5", "_isBigNumber": true}, {"type": "BigNumber", "hex": "0x01"}]"#,
        )
        .unwrap();

        assert_eq!(values[0], ChainValue::Null);
        assert_eq!(values[1], ChainValue::Bool(true));
        assert_eq!(values[2], ChainValue::Int(50));
        assert_eq!(values[3], ChainValue::Float(12.5));
        assert_eq!(values[4], ChainValue::Text("0x32".into()));
        assert_eq!(values[5], ChainValue::BigNumber { hex: "0xb5".into() });
        assert_eq!(values[6], ChainValue::BigNumber { hex: "0x01".into() });
    }

    #[test]
    fn test_hex_encoded() {
        assert!(ChainValue::from("0x32").is_hex_encoded());
        assert!(ChainValue::from("0X32").is_hex_encoded());
        assert!(ChainValue::big_number(181).is_hex_encoded());
        assert!(!ChainValue::from("50").is_hex_encoded());
        assert!(!ChainValue::Int(50).is_hex_encoded());
    }

    #[test]
    fn test_constructors() {
        assert_eq!(ChainValue::hex(181), ChainValue::Text("0xb5".into()));
        assert_eq!(ChainValue::from(None::<u64>), ChainValue::Null);
        assert_eq!(ChainValue::from(Some(3u64)).type_name(), "int");
    }
}
