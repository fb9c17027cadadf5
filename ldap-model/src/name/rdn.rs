use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use ldap_core::strings::trim_lower_ascii;
use ldap_core::{LdapError, LdapResult, Value};
use serde::{Deserialize, Serialize};

use crate::name::ava::Ava;
use crate::name::rdn_builder::RdnBuilder;
use crate::name::rdn_parser;
use crate::schema::SchemaManager;

/// How far an RDN's normalized parts have been computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Normalization {
    /// Empty or freshly constructed, nothing computed
    #[default]
    None,
    /// Types and values lowercased and trimmed without a schema
    Text,
    /// Types resolved to OIDs and values run through the schema normalizers
    Schema,
}

/// The AVAs of an RDN, sorted and free of duplicates
#[derive(Debug, Clone, Default)]
pub(crate) enum AvaSet {
    #[default]
    Empty,
    Single(Ava),
    Multi {
        avas: Vec<Ava>,
        /// Normalized type to positions in `avas`
        by_type: HashMap<String, Vec<usize>>,
    },
}

impl AvaSet {
    pub(crate) fn from_avas(mut avas: Vec<Ava>) -> Self {
        avas.sort();
        avas.dedup();
        match avas.len() {
            0 => AvaSet::Empty,
            1 => avas.pop().map(AvaSet::Single).unwrap_or_default(),
            _ => {
                let mut by_type: HashMap<String, Vec<usize>> = HashMap::new();
                for (i, ava) in avas.iter().enumerate() {
                    by_type.entry(ava.norm_type().to_string()).or_default().push(i);
                }
                AvaSet::Multi { avas, by_type }
            }
        }
    }

    pub(crate) fn as_slice(&self) -> &[Ava] {
        match self {
            AvaSet::Empty => &[],
            AvaSet::Single(ava) => std::slice::from_ref(ava),
            AvaSet::Multi { avas, .. } => avas,
        }
    }

    fn by_type(&self, norm_type: &str) -> Vec<&Ava> {
        match self {
            AvaSet::Empty => Vec::new(),
            AvaSet::Single(ava) => {
                if ava.norm_type() == norm_type {
                    vec![ava]
                } else {
                    Vec::new()
                }
            }
            AvaSet::Multi { avas, by_type } => by_type
                .get(norm_type)
                .map(|positions| positions.iter().map(|&i| &avas[i]).collect())
                .unwrap_or_default(),
        }
    }
}

/// Relative distinguished name: a non-ordered set of AVAs
///
/// `sn=Doe+cn=John` and `cn=John+sn=Doe` are the same RDN. An `Rdn` is
/// immutable once built; it is created by parsing text, from one
/// `(type, value)` pair, or incrementally through an [`RdnBuilder`].
///
/// # Usage Example
/// ```rust
/// use ldap_model::Rdn;
///
/// let rdn: Rdn = "CN=John + SN=Doe".parse().unwrap();
/// assert_eq!(rdn.len(), 2);
/// assert_eq!(rdn.norm_name(), "cn=john+sn=doe");
/// assert_eq!(rdn.up_name(), "CN=John + SN=Doe");
/// assert_eq!(rdn, "sn=doe+cn=JOHN".parse().unwrap());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RdnFields", into = "RdnFields")]
pub struct Rdn {
    pub(crate) up_name: String,
    pub(crate) norm_name: String,
    pub(crate) start: Option<usize>,
    pub(crate) length: usize,
    pub(crate) avas: AvaSet,
    pub(crate) normalization: Normalization,
}

/// Serialized form of an [`Rdn`]
///
/// The normalized name is left out when identical to the user-provided one
/// and the AVA lookup index is rebuilt on read.
#[derive(Serialize, Deserialize)]
struct RdnFields {
    up_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    norm_name: Option<String>,
    #[serde(default)]
    start: Option<usize>,
    length: usize,
    avas: Vec<Ava>,
    normalization: Normalization,
}

impl From<Rdn> for RdnFields {
    fn from(rdn: Rdn) -> Self {
        let norm_name = (rdn.norm_name != rdn.up_name).then_some(rdn.norm_name);
        RdnFields {
            up_name: rdn.up_name,
            norm_name,
            start: rdn.start,
            length: rdn.length,
            avas: rdn.avas.as_slice().to_vec(),
            normalization: rdn.normalization,
        }
    }
}

impl TryFrom<RdnFields> for Rdn {
    type Error = LdapError;

    fn try_from(fields: RdnFields) -> LdapResult<Self> {
        let avas = AvaSet::from_avas(fields.avas);
        let norm_name = fields.norm_name.unwrap_or_else(|| fields.up_name.clone());
        if norm_name != render_norm_name(avas.as_slice()) {
            return Err(LdapError::InvalidRdnSyntax(format!(
                "normalized name '{}' does not match the AVAs",
                norm_name
            )));
        }
        Ok(Rdn {
            up_name: fields.up_name,
            norm_name,
            start: fields.start,
            length: fields.length,
            avas,
            normalization: fields.normalization,
        })
    }
}

/// Render the normalized name of a sorted AVA slice
pub(crate) fn render_norm_name(avas: &[Ava]) -> String {
    avas.iter().map(Ava::norm_name).collect::<Vec<_>>().join("+")
}

impl Rdn {
    /// Parse an RDN with text normalization
    ///
    /// An empty string yields the empty RDN.
    ///
    /// # Error Handling
    /// Returns `InvalidRdnSyntax` for malformed input.
    pub fn parse(text: &str) -> LdapResult<Self> {
        Self::parse_with(text, None)
    }

    /// Parse an RDN, normalizing every AVA through `schema`
    ///
    /// # Error Handling
    /// Returns `InvalidRdnSyntax` for malformed input and
    /// `SchemaNormalization` for unknown attribute types or values the
    /// schema normalizer rejects.
    pub fn parse_with_schema(text: &str, schema: &dyn SchemaManager) -> LdapResult<Self> {
        Self::parse_with(text, Some(schema))
    }

    fn parse_with(text: &str, schema: Option<&dyn SchemaManager>) -> LdapResult<Self> {
        if text.is_empty() {
            return Ok(Rdn::default());
        }
        let mut builder = RdnBuilder::with_optional_schema(schema);
        rdn_parser::parse(text, &mut builder)?;
        builder.set_up_name(text);
        builder.set_offsets(0, text.len());
        Ok(builder.finish())
    }

    /// Create a single-AVA RDN from a type and an (unescaped) value
    ///
    /// # Example
    /// ```rust
    /// use ldap_model::Rdn;
    ///
    /// let rdn = Rdn::new("CN", "a,b").unwrap();
    /// assert_eq!(rdn.up_name(), "CN=a,b");
    /// assert_eq!(rdn.norm_name(), "cn=a\\,b");
    /// ```
    pub fn new(up_type: &str, up_value: impl Into<Value>) -> LdapResult<Self> {
        let up_value = up_value.into();
        let mut builder = RdnBuilder::new();
        builder.add_ava(up_type, up_type, up_value.clone(), up_value)?;
        Ok(builder.finish())
    }

    /// Create a single-AVA RDN normalized through `schema`
    pub fn new_with_schema(
        up_type: &str,
        up_value: impl Into<Value>,
        schema: &dyn SchemaManager,
    ) -> LdapResult<Self> {
        let up_value = up_value.into();
        let mut builder = RdnBuilder::with_schema(schema);
        builder.add_ava(up_type, up_type, up_value.clone(), up_value)?;
        Ok(builder.finish())
    }

    /// Create a single-AVA RDN from explicit user-provided and normalized parts
    pub fn with_normalized(
        up_type: &str,
        norm_type: &str,
        up_value: impl Into<Value>,
        norm_value: impl Into<Value>,
    ) -> LdapResult<Self> {
        let mut builder = RdnBuilder::new();
        builder.add_ava(up_type, norm_type, up_value.into(), norm_value.into())?;
        Ok(builder.finish())
    }

    /// Normalize every AVA through `schema`
    ///
    /// Types are resolved to their OID and the user-provided values run
    /// through the type's normalizer. An RDN that is already schema-normalized is returned
    /// unchanged; the user-provided name and offsets are always preserved.
    ///
    /// # Error Handling
    /// Returns `SchemaNormalization` when a type is unknown to the schema or
    /// a value cannot be normalized.
    pub fn normalize(self, schema: &dyn SchemaManager) -> LdapResult<Self> {
        if self.normalization == Normalization::Schema {
            return Ok(self);
        }

        // normalizers take the unescaped user value
        let mut builder = RdnBuilder::with_schema(schema);
        for ava in self.avas.as_slice() {
            builder.add_ava(
                ava.up_type(),
                ava.norm_type(),
                ava.up_value().clone(),
                ava.up_value().clone(),
            )?;
        }
        builder.set_up_name(&self.up_name);
        if let Some(start) = self.start {
            builder.set_offsets(start, self.length);
        }
        let rdn = builder.finish();
        log::debug!("normalized RDN '{}' to '{}'", rdn.up_name, rdn.norm_name);
        Ok(rdn)
    }

    /// User-provided text of the RDN
    pub fn up_name(&self) -> &str {
        &self.up_name
    }

    /// Canonical text of the RDN
    pub fn norm_name(&self) -> &str {
        &self.norm_name
    }

    /// Number of AVAs
    pub fn len(&self) -> usize {
        self.avas.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offset of this RDN inside its DN text, `None` when unattached
    pub fn start(&self) -> Option<usize> {
        self.start
    }

    /// Length of the user-provided text
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Check if the RDN went through schema normalization
    pub fn is_normalized(&self) -> bool {
        self.normalization == Normalization::Schema
    }

    /// First AVA in sorted order
    pub fn ava(&self) -> Option<&Ava> {
        self.avas.as_slice().first()
    }

    /// Iterate over the AVAs in sorted order
    pub fn iter(&self) -> std::slice::Iter<'_, Ava> {
        self.avas.as_slice().iter()
    }

    /// AVAs whose normalized type matches `attribute_type` (case-insensitive)
    pub fn ava_by_type(&self, attribute_type: &str) -> Vec<&Ava> {
        self.avas.by_type(&trim_lower_ascii(attribute_type))
    }

    pub fn up_type(&self) -> Option<&str> {
        self.ava().map(Ava::up_type)
    }

    pub fn norm_type(&self) -> Option<&str> {
        self.ava().map(Ava::norm_type)
    }

    pub fn up_value(&self) -> Option<&Value> {
        self.ava().map(Ava::up_value)
    }

    pub fn norm_value(&self) -> Option<&Value> {
        self.ava().map(Ava::norm_value)
    }

    /// Normalized value for `attribute_type`
    ///
    /// Several values of the same type are joined with `,`; an absent type
    /// yields an empty string value.
    pub fn value(&self, attribute_type: &str) -> Value {
        let avas = self.ava_by_type(attribute_type);
        match avas.as_slice() {
            [] => Value::default(),
            [single] => single.norm_value().clone(),
            many => Value::String(
                many.iter()
                    .map(|ava| ava.norm_value().to_text())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        }
    }
}

impl FromStr for Rdn {
    type Err = LdapError;

    fn from_str(s: &str) -> LdapResult<Self> {
        Rdn::parse(s)
    }
}

impl<'a> IntoIterator for &'a Rdn {
    type Item = &'a Ava;
    type IntoIter = std::slice::Iter<'a, Ava>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for Rdn {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rdn {}

impl PartialOrd for Rdn {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// RDNs with fewer AVAs sort first; equal-sized RDNs compare AVA by AVA
impl Ord for Rdn {
    fn cmp(&self, other: &Self) -> Ordering {
        self.len()
            .cmp(&other.len())
            .then_with(|| self.iter().cmp(other.iter()))
    }
}

impl Hash for Rdn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for ava in self.iter() {
            ava.hash(state);
        }
    }
}

impl fmt::Display for Rdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.up_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{MockSchemaManager, NormalizerMapping};
    use std::collections::HashSet;

    fn rdn(text: &str) -> Rdn {
        Rdn::parse(text).unwrap()
    }

    #[test]
    fn test_empty_rdn() {
        let empty = rdn("");
        assert!(empty.is_empty());
        assert_eq!(empty.norm_name(), "");
        assert_eq!(empty.start(), None);
        assert_eq!(empty.length(), 0);
        assert_eq!(empty.ava(), None);
        assert_eq!(empty, Rdn::default());
    }

    #[test]
    fn test_single_ava() {
        let r = rdn(" CN = Foo ");
        assert_eq!(r.len(), 1);
        assert_eq!(r.up_name(), " CN = Foo ");
        assert_eq!(r.norm_name(), "cn=foo");
        assert_eq!(r.up_type(), Some("CN"));
        assert_eq!(r.norm_type(), Some("cn"));
        assert_eq!(r.up_value(), Some(&Value::from("Foo")));
        assert_eq!(r.norm_value(), Some(&Value::from("foo")));
        assert_eq!(r.start(), Some(0));
        assert_eq!(r.length(), 10);
        assert_eq!(r.normalization(), Normalization::Text);
        assert!(!r.is_normalized());
        assert_eq!(r.to_string(), " CN = Foo ");
    }

    #[test]
    fn test_multi_valued_order_is_irrelevant() {
        let a = rdn("cn=a+sn=b");
        let b = rdn("sn=b+cn=a");
        assert_eq!(a, b);
        assert_eq!(a.norm_name(), "cn=a+sn=b");
        assert_eq!(b.norm_name(), "cn=a+sn=b");

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_duplicate_avas_collapse() {
        let r = rdn("cn=a+CN=A");
        assert_eq!(r.len(), 1);
        assert_eq!(r.norm_name(), "cn=a");
    }

    #[test]
    fn test_value_lookup() {
        let r = rdn("cn=a+sn=b+cn=c");
        assert_eq!(r.value("CN"), Value::from("a,c"));
        assert_eq!(r.value("sn"), Value::from("b"));
        assert_eq!(r.value("ou"), Value::from(""));
        assert_eq!(r.ava_by_type("cn").len(), 2);
        assert_eq!(r.ava().map(Ava::norm_type), Some("cn"));
        assert_eq!(r.iter().count(), 3);
    }

    #[test]
    fn test_ordering() {
        // fewer AVAs first
        assert!(rdn("cn=z") < rdn("cn=a+sn=a"));
        assert!(rdn("") < rdn("cn=a"));
        // then AVA by AVA
        assert!(rdn("cn=a") < rdn("cn=b"));
        assert!(rdn("cn=b") < rdn("sn=a"));
        assert!(rdn("cn=a+sn=b") < rdn("cn=a+sn=c"));

        let x = rdn("cn=a");
        let y = rdn("cn=b");
        assert_eq!(x.cmp(&y), y.cmp(&x).reverse());
        assert_eq!(x.cmp(&x.clone()), Ordering::Equal);
    }

    #[test]
    fn test_binary_value() {
        let r = rdn("userPassword=#01FF");
        assert_eq!(r.norm_value(), Some(&Value::Binary(vec![0x01, 0xFF])));
        assert_eq!(r.norm_name(), "userpassword=#01FF");
    }

    #[test]
    fn test_constructors() {
        let r = Rdn::new("CN", " Foo ").unwrap();
        assert_eq!(r.up_name(), "CN= Foo ");
        assert_eq!(r.norm_name(), "cn=foo");
        assert_eq!(r.start(), Some(0));

        let r = Rdn::with_normalized("CN", "cn", "Foo", "foo").unwrap();
        assert_eq!(r, rdn("cn=foo"));

        assert!(Rdn::new("", "x").is_err());
    }

    #[test]
    fn test_normalize_with_schema() {
        let schema = NormalizerMapping::with_core_attributes();
        let r = rdn("CN=John  Doe+sn=X").normalize(&schema).unwrap();
        assert!(r.is_normalized());
        assert_eq!(r.up_name(), "CN=John  Doe+sn=X");
        assert_eq!(r.norm_name(), "2.5.4.3=john doe+2.5.4.4=x");

        // idempotent
        let again = r.clone().normalize(&schema).unwrap();
        assert_eq!(again.norm_name(), r.norm_name());
        assert_eq!(again.up_name(), r.up_name());
    }

    #[test]
    fn test_parse_with_schema_matches_normalize() {
        let schema = NormalizerMapping::with_core_attributes();
        for text in ["userPassword=Secret", "CN=John  Doe + userPassword=Mixed\\,Case"] {
            let parsed = Rdn::parse_with_schema(text, &schema).unwrap();
            let normalized = rdn(text).normalize(&schema).unwrap();
            assert_eq!(parsed, normalized, "{}", text);
            assert_eq!(parsed.norm_name(), normalized.norm_name());
            assert_eq!(normalized.up_name(), text);
        }

        // userPassword keeps its case
        let r = rdn("userPassword=Secret").normalize(&schema).unwrap();
        assert_eq!(r.value("2.5.4.35"), Value::from("Secret"));
        assert_eq!(r.norm_name(), "2.5.4.35=Secret");
    }

    #[test]
    fn test_normalize_skips_schema_when_done() {
        let schema = NormalizerMapping::with_core_attributes();
        let r = Rdn::parse_with_schema("cn=Foo", &schema).unwrap();

        let mut mock = MockSchemaManager::new();
        mock.expect_lookup().times(0);
        let same = r.clone().normalize(&mock).unwrap();
        assert_eq!(same.norm_name(), "2.5.4.3=foo");
    }

    #[test]
    fn test_unknown_type_fails_normalization() {
        let mut mock = MockSchemaManager::new();
        mock.expect_lookup().times(1).returning(|_| None);
        let err = rdn("foo=bar").normalize(&mock).unwrap_err();
        assert!(matches!(err, LdapError::SchemaNormalization { .. }));
    }

    #[test]
    fn test_serde_keeps_equality() {
        let r = rdn("cn=a+SN=B");
        let json = serde_json::to_string(&r).unwrap();
        let back: Rdn = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
        assert_eq!(back.up_name(), r.up_name());
        assert_eq!(back.norm_name(), r.norm_name());
        assert_eq!(back.value("cn"), Value::from("a"));
    }

    #[test]
    fn test_serde_omits_identical_norm_name() {
        let r = rdn("cn=a");
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("norm_name").is_none());
        let back: Rdn = serde_json::from_value(json).unwrap();
        assert_eq!(back.norm_name(), "cn=a");
    }
}
