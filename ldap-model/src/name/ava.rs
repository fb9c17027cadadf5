use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use ldap_core::strings::trim_lower_ascii;
use ldap_core::{LdapError, LdapResult, Value};
use serde::{Deserialize, Serialize};

use crate::name::escape::{escape_value, escape_value_bytes};

/// Attribute value assertion: one `type=value` pair of an RDN
///
/// Holds the user-provided type and value next to their normalized forms.
/// Two AVAs are equal when their normalized type and value are; the order
/// compares normalized types first, then normalized values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "AvaFields")]
pub struct Ava {
    up_type: String,
    norm_type: String,
    up_value: Value,
    norm_value: Value,
}

/// Unchecked field set, validated on deserialization
#[derive(Deserialize)]
struct AvaFields {
    up_type: String,
    norm_type: String,
    up_value: Value,
    norm_value: Value,
}

impl TryFrom<AvaFields> for Ava {
    type Error = LdapError;

    fn try_from(fields: AvaFields) -> LdapResult<Self> {
        Ava::with_normalized(
            &fields.up_type,
            &fields.norm_type,
            fields.up_value,
            fields.norm_value,
        )
    }
}

impl Ava {
    /// Create an AVA with text normalization
    ///
    /// The normalized type is the trimmed, lowercased type; a string value
    /// is trimmed and lowercased, a binary value is kept as is.
    ///
    /// # Error Handling
    /// Returns `InvalidRdnSyntax` if the type is empty.
    pub fn new(up_type: &str, up_value: impl Into<Value>) -> LdapResult<Self> {
        let up_value = up_value.into();
        let norm_value = text_normalize(&up_value);
        Self::with_normalized(up_type, up_type, up_value, norm_value)
    }

    /// Create an AVA from already normalized parts
    ///
    /// Only the type goes through trimming and lowercasing; `norm_value` is
    /// stored as given.
    pub fn with_normalized(
        up_type: &str,
        norm_type: &str,
        up_value: Value,
        norm_value: Value,
    ) -> LdapResult<Self> {
        let norm_type = trim_lower_ascii(norm_type);
        if up_type.trim().is_empty() || norm_type.is_empty() {
            return Err(LdapError::InvalidRdnSyntax(
                "null or empty attribute type".to_string(),
            ));
        }
        Ok(Self {
            up_type: up_type.to_string(),
            norm_type,
            up_value,
            norm_value,
        })
    }

    pub fn up_type(&self) -> &str {
        &self.up_type
    }

    pub fn norm_type(&self) -> &str {
        &self.norm_type
    }

    pub fn up_value(&self) -> &Value {
        &self.up_value
    }

    pub fn norm_value(&self) -> &Value {
        &self.norm_value
    }

    /// User-provided form, `type=value`
    pub fn up_name(&self) -> String {
        match &self.up_value {
            Value::String(s) => format!("{}={}", self.up_type, s),
            Value::Binary(b) => format!("{}={}", self.up_type, escape_value_bytes(b)),
        }
    }

    /// Normalized form: `type=escaped value`, or `type=#HEX` for binary values
    pub fn norm_name(&self) -> String {
        match &self.norm_value {
            Value::String(s) => format!("{}={}", self.norm_type, escape_value(s)),
            Value::Binary(b) => format!("{}={}", self.norm_type, escape_value_bytes(b)),
        }
    }
}

/// Text normalization applied when no schema is available
pub(crate) fn text_normalize(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_lowercase()),
        Value::Binary(b) => Value::Binary(b.clone()),
    }
}

impl PartialEq for Ava {
    fn eq(&self, other: &Self) -> bool {
        self.norm_type == other.norm_type && self.norm_value == other.norm_value
    }
}

impl Eq for Ava {}

impl PartialOrd for Ava {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ava {
    fn cmp(&self, other: &Self) -> Ordering {
        self.norm_type
            .cmp(&other.norm_type)
            .then_with(|| self.norm_value.cmp(&other.norm_value))
    }
}

impl Hash for Ava {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.norm_type.hash(state);
        self.norm_value.hash(state);
    }
}

impl fmt::Display for Ava {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.up_name())
    }
}
