//! Attribute value assertion of search filters and compare requests
//!
//! ```text
//! AttributeValueAssertion ::= SEQUENCE {
//!     attributeDesc   AttributeDescription,   -- OCTET STRING
//!     assertionValue  AssertionValue }        -- OCTET STRING
//! ```
//!
//! Inside a filter the SEQUENCE tag is replaced by the context tag of the
//! filter choice, e.g. `[3]` (0xA3) for equalityMatch.

use std::fmt;

use bytes::Bytes;
use ldap_asn1::ber::{BerDecoder, BerEncoder, BerTag};
use ldap_core::strings::dump_bytes;
use ldap_core::{LdapError, LdapResult};

/// Filter choices of RFC 4511 §4.5.1, by their context tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FilterType {
    And = 0xA0,
    Or = 0xA1,
    Not = 0xA2,
    EqualityMatch = 0xA3,
    Substrings = 0xA4,
    GreaterOrEqual = 0xA5,
    LessOrEqual = 0xA6,
    Present = 0x87,
    ApproxMatch = 0xA8,
    ExtensibleMatch = 0xA9,
}

impl FilterType {
    /// Get the filter type from its tag octet
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0xA0 => Some(FilterType::And),
            0xA1 => Some(FilterType::Or),
            0xA2 => Some(FilterType::Not),
            0xA3 => Some(FilterType::EqualityMatch),
            0xA4 => Some(FilterType::Substrings),
            0xA5 => Some(FilterType::GreaterOrEqual),
            0xA6 => Some(FilterType::LessOrEqual),
            0x87 => Some(FilterType::Present),
            0xA8 => Some(FilterType::ApproxMatch),
            0xA9 => Some(FilterType::ExtensibleMatch),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    fn ber_tag(self) -> BerTag {
        let tag = self.tag();
        BerTag::context_specific(tag & 0x20 != 0, (tag & 0x1F) as u32)
    }

    /// Operator of the filter when its body is an attribute value assertion
    pub fn assertion_operator(self) -> Option<&'static str> {
        match self {
            FilterType::EqualityMatch => Some("="),
            FilterType::LessOrEqual => Some("<="),
            FilterType::GreaterOrEqual => Some(">="),
            FilterType::ApproxMatch => Some("~="),
            _ => None,
        }
    }
}

/// An attribute description paired with an assertion value
///
/// Either part may be unset while a filter is being built or decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeValueAssertion {
    attribute_desc: Option<String>,
    assertion: Option<Vec<u8>>,
}

impl AttributeValueAssertion {
    pub fn new(attribute_desc: &str, assertion: &[u8]) -> Self {
        Self {
            attribute_desc: Some(attribute_desc.to_string()),
            assertion: Some(assertion.to_vec()),
        }
    }

    pub fn attribute_desc(&self) -> Option<&str> {
        self.attribute_desc.as_deref()
    }

    pub fn set_attribute_desc(&mut self, attribute_desc: &str) {
        self.attribute_desc = Some(attribute_desc.to_string());
    }

    pub fn assertion(&self) -> Option<&[u8]> {
        self.assertion.as_deref()
    }

    /// Store a copy of `assertion`
    pub fn set_assertion(&mut self, assertion: &[u8]) {
        self.assertion = Some(assertion.to_vec());
    }

    /// Render as an RFC 4515 filter item such as `cn>=smith`
    ///
    /// # Error Handling
    /// Returns `InvalidArgument` for filter types whose body is not an
    /// attribute value assertion.
    pub fn to_rfc2254(&self, filter_type: FilterType) -> LdapResult<String> {
        let operator = filter_type.assertion_operator().ok_or_else(|| {
            LdapError::InvalidArgument(format!(
                "filter type {:?} (0x{:02X}) has no attribute value assertion",
                filter_type,
                filter_type.tag()
            ))
        })?;
        Ok(format!(
            "{}{}{}",
            self.attribute_desc.as_deref().unwrap_or_default(),
            operator,
            escape_assertion(self.assertion.as_deref().unwrap_or_default())
        ))
    }

    /// Indented multi-line dump, each line prefixed by `tabs`
    pub fn to_string_with_tabs(&self, tabs: &str) -> String {
        format!(
            "{tabs}AttributeValueAssertion\n\
             {tabs}    Assertion description : '{}'\n\
             {tabs}    Assertion value : '{}'\n",
            self.attribute_desc.as_deref().unwrap_or("null"),
            self.assertion.as_deref().map(dump_bytes).unwrap_or_default(),
        )
    }

    /// Encode as the body of `filter_type`
    ///
    /// # Error Handling
    /// Returns `InvalidArgument` for a filter type without an assertion body
    /// and `Encoding` when the attribute description is unset.
    pub fn encode(&self, filter_type: FilterType) -> LdapResult<Bytes> {
        if filter_type.assertion_operator().is_none() {
            return Err(LdapError::InvalidArgument(format!(
                "cannot encode an attribute value assertion as {:?}",
                filter_type
            )));
        }
        let desc = self
            .attribute_desc
            .as_deref()
            .ok_or_else(|| LdapError::Encoding("attributeDesc not set".to_string()))?;

        let mut fields = BerEncoder::new();
        fields.encode_octet_string(desc.as_bytes());
        fields.encode_octet_string(self.assertion.as_deref().unwrap_or_default());

        let mut encoder = BerEncoder::with_capacity(fields.len() + 4);
        encoder.encode_tlv(&filter_type.ber_tag(), fields.as_bytes());
        Ok(encoder.into_bytes())
    }

    /// Decode a filter whose body is an attribute value assertion
    ///
    /// # Returns
    /// The filter type and the assertion.
    pub fn decode(data: &[u8]) -> LdapResult<(FilterType, Self)> {
        let filter_type = data
            .first()
            .and_then(|&tag| FilterType::from_tag(tag))
            .filter(|f| f.assertion_operator().is_some())
            .ok_or_else(|| LdapError::decoding("expected an attribute value assertion filter"))?;

        let mut decoder = BerDecoder::new(data);
        let (_, content, _) = decoder.decode_tlv()?;
        if decoder.has_remaining() {
            return Err(LdapError::decoding("unexpected trailing data after filter"));
        }

        let mut fields = BerDecoder::new(content);
        let desc = fields.decode_octet_string()?;
        let assertion = fields.decode_octet_string()?;
        if fields.has_remaining() {
            return Err(LdapError::decoding("unexpected extra field"));
        }
        let desc = std::str::from_utf8(desc)
            .map_err(|_| LdapError::decoding("attributeDesc is not valid UTF-8"))?;

        Ok((filter_type, Self::new(desc, assertion)))
    }
}

/// RFC 4515 value escaping
///
/// UTF-8 text keeps its characters except `*`, `(`, `)`, `\` and NUL;
/// anything that is not UTF-8 is escaped byte by byte.
fn escape_assertion(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => {
            let mut out = String::with_capacity(text.len());
            for c in text.chars() {
                match c {
                    '*' | '(' | ')' | '\\' | '\0' => out.push_str(&format!("\\{:02x}", c as u32)),
                    c => out.push(c),
                }
            }
            out
        }
        Err(_) => bytes.iter().map(|b| format!("\\{:02x}", b)).collect(),
    }
}

impl fmt::Display for AttributeValueAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with_tabs(""))
    }
}
