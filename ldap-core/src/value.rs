//! Attribute value type shared by the name model and the codec

use serde::{Deserialize, Serialize};
use std::fmt;

/// An attribute value as it appears in an AVA
///
/// LDAP values are either human readable strings or opaque octets (a
/// `#`-prefixed hex string in a DN). The derived ordering puts every string
/// before every binary value; strings compare lexicographically, binary
/// values byte-wise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Binary(#[serde(with = "serde_bytes")] Vec<u8>),
}

impl Value {
    /// Check if this is a binary value
    pub fn is_binary(&self) -> bool {
        matches!(self, Value::Binary(_))
    }

    /// Get the string content, `None` for binary values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Binary(_) => None,
        }
    }

    /// Get the raw bytes of the value (UTF-8 bytes for strings)
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Value::String(s) => s.as_bytes(),
            Value::Binary(b) => b,
        }
    }

    /// Check if the value holds no character and no byte
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Get the value as text, decoding binary content as (lossy) UTF-8
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Binary(b) => String::from_utf8_lossy(b).into_owned(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::String(String::new())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Binary(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Binary(b) => write!(f, "#{}", hex::encode_upper(b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        let a = Value::from("a");
        let b = Value::from("b");
        let bin = Value::from(vec![0x00]);
        assert!(a < b);
        assert!(b < bin);
        assert!(Value::from(vec![0x01]) > Value::from(vec![0x00, 0xFF]));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("John").to_string(), "John");
        assert_eq!(Value::from(vec![0x41, 0xAB]).to_string(), "#41AB");
    }

    #[test]
    fn test_serde_binary() {
        let value = Value::Binary(vec![1, 2, 3]);
        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
