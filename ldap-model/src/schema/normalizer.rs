use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ldap_core::strings::{deep_trim_to_lower, trim_lower_ascii};
use ldap_core::{LdapError, LdapResult, Value};

/// Turns an attribute value into its canonical form
pub trait Normalizer: Send + Sync + fmt::Debug {
    fn normalize(&self, value: &Value) -> LdapResult<Value>;
}

/// Returns values unchanged, for octet-string attributes
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNormalizer;

impl Normalizer for NoOpNormalizer {
    fn normalize(&self, value: &Value) -> LdapResult<Value> {
        Ok(value.clone())
    }
}

/// Collapses whitespace runs, trims and lowercases string values
///
/// Binary values are rejected: a directory string attribute never holds one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepTrimToLowerNormalizer;

impl Normalizer for DeepTrimToLowerNormalizer {
    fn normalize(&self, value: &Value) -> LdapResult<Value> {
        match value {
            Value::String(s) => Ok(Value::String(deep_trim_to_lower(s))),
            Value::Binary(_) => Err(LdapError::InvalidAttributeSyntax(
                "binary value given to a string normalizer".to_string(),
            )),
        }
    }
}

/// Attribute type OID paired with the normalizer of its equality rule
#[derive(Debug, Clone)]
pub struct OidNormalizer {
    attribute_type_oid: String,
    normalizer: Arc<dyn Normalizer>,
}

impl OidNormalizer {
    pub fn new(attribute_type_oid: &str, normalizer: Arc<dyn Normalizer>) -> Self {
        Self {
            attribute_type_oid: attribute_type_oid.to_string(),
            normalizer,
        }
    }

    pub fn attribute_type_oid(&self) -> &str {
        &self.attribute_type_oid
    }

    pub fn normalizer(&self) -> &dyn Normalizer {
        self.normalizer.as_ref()
    }
}

/// Read-only view of the schema used while normalizing names
///
/// `name` is either a lowercased attribute type name or a numeric OID.
#[cfg_attr(test, mockall::automock)]
pub trait SchemaManager {
    fn lookup(&self, name: &str) -> Option<OidNormalizer>;
}

/// `HashMap`-backed [`SchemaManager`]
///
/// # Usage Example
/// ```rust
/// use std::sync::Arc;
/// use ldap_model::schema::{NoOpNormalizer, NormalizerMapping, SchemaManager};
///
/// let mut mapping = NormalizerMapping::new();
/// mapping.register("1.2.3.4", &["myAttr"], Arc::new(NoOpNormalizer));
/// assert_eq!(mapping.lookup("MYATTR").unwrap().attribute_type_oid(), "1.2.3.4");
/// assert!(mapping.lookup("1.2.3.4").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct NormalizerMapping {
    entries: HashMap<String, OidNormalizer>,
}

/// Core attribute types and their names (RFC 4519, RFC 4524)
const CORE_STRING_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("2.5.4.3", &["cn", "commonName"]),
    ("2.5.4.4", &["sn", "surname"]),
    ("2.5.4.6", &["c", "countryName"]),
    ("2.5.4.7", &["l", "localityName"]),
    ("2.5.4.8", &["st", "stateOrProvinceName"]),
    ("2.5.4.10", &["o", "organizationName"]),
    ("2.5.4.11", &["ou", "organizationalUnitName"]),
    ("2.5.4.42", &["givenName"]),
    ("0.9.2342.19200300.100.1.1", &["uid", "userid"]),
    ("0.9.2342.19200300.100.1.25", &["dc", "domainComponent"]),
];

const USER_PASSWORD_OID: &str = "2.5.4.35";

impl NormalizerMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping preloaded with the usual naming attributes
    ///
    /// String attributes use [`DeepTrimToLowerNormalizer`]; `userPassword`
    /// uses [`NoOpNormalizer`].
    pub fn with_core_attributes() -> Self {
        let mut mapping = Self::new();
        let string_normalizer: Arc<dyn Normalizer> = Arc::new(DeepTrimToLowerNormalizer);
        for (oid, names) in CORE_STRING_ATTRIBUTES {
            mapping.register(oid, names, Arc::clone(&string_normalizer));
        }
        mapping.register(USER_PASSWORD_OID, &["userPassword"], Arc::new(NoOpNormalizer));
        mapping
    }

    /// Register `oid` under itself and every name in `names`
    pub fn register(&mut self, oid: &str, names: &[&str], normalizer: Arc<dyn Normalizer>) {
        let entry = OidNormalizer::new(oid, normalizer);
        for name in names {
            self.entries.insert(trim_lower_ascii(name), entry.clone());
        }
        self.entries.insert(oid.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SchemaManager for NormalizerMapping {
    fn lookup(&self, name: &str) -> Option<OidNormalizer> {
        self.entries.get(&trim_lower_ascii(name)).cloned()
    }
}
