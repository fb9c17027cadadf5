use ldap_core::strings::trim_lower_ascii;
use ldap_core::{LdapError, LdapResult, Value};

use crate::name::ava::{Ava, text_normalize};
use crate::name::rdn::{AvaSet, Normalization, Rdn, render_norm_name};
use crate::schema::SchemaManager;

/// Incremental construction of an [`Rdn`]
///
/// Parsers append AVAs one by one and call [`RdnBuilder::finish`] once the
/// RDN text is consumed. With a schema attached every AVA is normalized
/// through it as it is added; without one, types and string values are
/// trimmed and lowercased.
///
/// # Usage Example
/// ```rust
/// use ldap_model::RdnBuilder;
///
/// let mut builder = RdnBuilder::new();
/// builder.add_ava("SN", "sn", "Doe".into(), "Doe".into()).unwrap();
/// builder.add_ava("CN", "cn", "John".into(), "John".into()).unwrap();
/// let rdn = builder.finish();
/// assert_eq!(rdn.norm_name(), "cn=john+sn=doe");
/// assert_eq!(rdn.up_name(), "SN=Doe+CN=John");
/// ```
#[derive(Default)]
pub struct RdnBuilder<'s> {
    schema: Option<&'s dyn SchemaManager>,
    avas: Vec<Ava>,
    up_name: Option<String>,
    offsets: Option<(usize, usize)>,
}

impl<'s> RdnBuilder<'s> {
    /// Create a builder that applies text normalization
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder that normalizes through `schema`
    pub fn with_schema(schema: &'s dyn SchemaManager) -> Self {
        Self::with_optional_schema(Some(schema))
    }

    pub(crate) fn with_optional_schema(schema: Option<&'s dyn SchemaManager>) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }

    /// Append one AVA
    ///
    /// # Arguments
    /// * `up_type` - Attribute type as written by the user
    /// * `norm_type` - Type to normalize (name or OID)
    /// * `up_value` - Unescaped value as provided by the user
    /// * `norm_value` - Unescaped value to normalize
    ///
    /// # Error Handling
    /// Returns `InvalidRdnSyntax` for an empty type and `SchemaNormalization`
    /// when the schema does not know the type or rejects the value.
    pub fn add_ava(
        &mut self,
        up_type: &str,
        norm_type: &str,
        up_value: Value,
        norm_value: Value,
    ) -> LdapResult<()> {
        let ava = match self.schema {
            Some(schema) => {
                let key = trim_lower_ascii(norm_type);
                let oid_normalizer = schema.lookup(&key).ok_or_else(|| {
                    log::debug!("no normalizer registered for attribute type '{}'", key);
                    LdapError::schema(format!("unknown attribute type '{}'", up_type))
                })?;
                let normalized = oid_normalizer
                    .normalizer()
                    .normalize(&norm_value)
                    .map_err(|e| {
                        LdapError::schema_with_source(
                            format!("cannot normalize the value of '{}'", up_type),
                            e,
                        )
                    })?;
                Ava::with_normalized(
                    up_type,
                    oid_normalizer.attribute_type_oid(),
                    up_value,
                    normalized,
                )?
            }
            None => Ava::with_normalized(up_type, norm_type, up_value, text_normalize(&norm_value))?,
        };
        self.avas.push(ava);
        Ok(())
    }

    /// Append an AVA as is, bypassing normalization
    pub fn push(&mut self, ava: Ava) {
        self.avas.push(ava);
    }

    /// Set the user-provided text; defaults to the AVAs joined with `+`
    pub fn set_up_name(&mut self, up_name: &str) {
        self.up_name = Some(up_name.to_string());
    }

    /// Set the position of the RDN text inside its DN
    pub fn set_offsets(&mut self, start: usize, length: usize) {
        self.offsets = Some((start, length));
    }

    /// Number of AVAs added so far
    pub fn len(&self) -> usize {
        self.avas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.avas.is_empty()
    }

    /// Drop every AVA, name and offset; the schema stays attached
    pub fn clear(&mut self) {
        self.avas.clear();
        self.up_name = None;
        self.offsets = None;
    }

    /// Sort and deduplicate the AVAs and compute the normalized name
    pub fn finish(self) -> Rdn {
        let up_name = self.up_name.unwrap_or_else(|| {
            self.avas
                .iter()
                .map(Ava::up_name)
                .collect::<Vec<_>>()
                .join("+")
        });
        let (start, length) = self.offsets.unwrap_or((0, up_name.len()));
        let normalization = if self.schema.is_some() {
            Normalization::Schema
        } else {
            Normalization::Text
        };

        let avas = AvaSet::from_avas(self.avas);
        let norm_name = render_norm_name(avas.as_slice());

        Rdn {
            up_name,
            norm_name,
            start: Some(start),
            length,
            avas,
            normalization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DeepTrimToLowerNormalizer, MockSchemaManager, OidNormalizer};
    use std::sync::Arc;

    #[test]
    fn test_offsets() {
        let mut builder = RdnBuilder::new();
        builder.add_ava("cn", "cn", "a".into(), "a".into()).unwrap();
        builder.set_up_name("cn=a");
        builder.set_offsets(7, 4);
        let rdn = builder.finish();
        assert_eq!(rdn.start(), Some(7));
        assert_eq!(rdn.length(), 4);
    }

    #[test]
    fn test_clear() {
        let mut builder = RdnBuilder::new();
        builder.add_ava("cn", "cn", "a".into(), "a".into()).unwrap();
        builder.set_up_name("cn=a");
        builder.clear();
        assert!(builder.is_empty());
        builder.add_ava("sn", "sn", "b".into(), "b".into()).unwrap();
        let rdn = builder.finish();
        assert_eq!(rdn.up_name(), "sn=b");
        assert_eq!(rdn.len(), 1);
    }

    #[test]
    fn test_schema_lookup_by_lowercased_type() {
        let mut schema = MockSchemaManager::new();
        schema.expect_lookup().times(1).returning(|name| {
            assert_eq!(name, "cn");
            Some(OidNormalizer::new("2.5.4.3", Arc::new(DeepTrimToLowerNormalizer)))
        });

        let mut builder = RdnBuilder::with_schema(&schema);
        builder
            .add_ava(" CN ", " CN ", "A  B".into(), "A  B".into())
            .unwrap();
        assert_eq!(builder.len(), 1);
        let rdn = builder.finish();
        assert_eq!(rdn.norm_name(), "2.5.4.3=a b");
        assert!(rdn.is_normalized());
    }

    #[test]
    fn test_push_bypasses_normalization() {
        let mut builder = RdnBuilder::new();
        builder.push(Ava::with_normalized("CN", "cn", "Foo".into(), "Foo".into()).unwrap());
        assert_eq!(builder.finish().norm_name(), "cn=Foo");
    }
}
