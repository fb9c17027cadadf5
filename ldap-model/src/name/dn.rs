use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use ldap_core::{LdapError, LdapResult};
use serde::{Deserialize, Serialize};

use crate::name::rdn::Rdn;
use crate::name::rdn_builder::RdnBuilder;
use crate::name::rdn_parser;
use crate::schema::SchemaManager;

/// Distinguished name: an ordered sequence of RDNs, most specific first
///
/// Each RDN records its offset and length inside the DN text.
///
/// # Usage Example
/// ```rust
/// use ldap_model::Dn;
///
/// let dn: Dn = "CN=John, O=Acme ; C=US".parse().unwrap();
/// assert_eq!(dn.len(), 3);
/// assert_eq!(dn.norm_name(), "cn=john,o=acme,c=us");
/// assert_eq!(dn.rdns()[1].start(), Some(8));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dn {
    up_name: String,
    rdns: Vec<Rdn>,
}

impl Dn {
    /// Parse a DN with text normalization; `""` is the root DN
    pub fn parse(text: &str) -> LdapResult<Self> {
        Self::parse_with(text, None)
    }

    /// Parse a DN, normalizing every RDN through `schema`
    pub fn parse_with_schema(text: &str, schema: &dyn SchemaManager) -> LdapResult<Self> {
        Self::parse_with(text, Some(schema))
    }

    fn parse_with(text: &str, schema: Option<&dyn SchemaManager>) -> LdapResult<Self> {
        let mut rdns = Vec::new();
        if !text.trim().is_empty() {
            for (start, end) in split_components(text)? {
                let component = &text[start..end];
                let mut builder = RdnBuilder::with_optional_schema(schema);
                rdn_parser::parse(component, &mut builder)?;
                builder.set_up_name(component);
                builder.set_offsets(start, component.len());
                rdns.push(builder.finish());
            }
        }
        Ok(Self {
            up_name: text.to_string(),
            rdns,
        })
    }

    /// Normalize every RDN through `schema`, keeping the user-provided text
    pub fn normalize(self, schema: &dyn SchemaManager) -> LdapResult<Self> {
        let rdns = self
            .rdns
            .into_iter()
            .map(|rdn| rdn.normalize(schema))
            .collect::<LdapResult<Vec<_>>>()?;
        Ok(Self {
            up_name: self.up_name,
            rdns,
        })
    }

    pub fn rdns(&self) -> &[Rdn] {
        &self.rdns
    }

    /// Most specific RDN, `None` for the root DN
    pub fn rdn(&self) -> Option<&Rdn> {
        self.rdns.first()
    }

    pub fn len(&self) -> usize {
        self.rdns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rdns.is_empty()
    }

    pub fn up_name(&self) -> &str {
        &self.up_name
    }

    /// Normalized RDNs joined with `,`
    pub fn norm_name(&self) -> String {
        self.rdns
            .iter()
            .map(Rdn::norm_name)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Check if every RDN went through schema normalization
    pub fn is_normalized(&self) -> bool {
        self.rdns.iter().all(Rdn::is_normalized)
    }
}

/// Byte ranges of the RDN components, split on unescaped `,` or `;`
fn split_components(text: &str) -> LdapResult<Vec<(usize, usize)>> {
    let bytes = text.as_bytes();
    let mut components = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'"' => in_quotes = !in_quotes,
            b',' | b';' if !in_quotes => {
                components.push((start, i));
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if in_quotes {
        return Err(LdapError::InvalidRdnSyntax(format!(
            "unterminated quoted value in '{}'",
            text
        )));
    }
    components.push((start, bytes.len()));
    Ok(components)
}

impl FromStr for Dn {
    type Err = LdapError;

    fn from_str(s: &str) -> LdapResult<Self> {
        Dn::parse(s)
    }
}

impl PartialEq for Dn {
    fn eq(&self, other: &Self) -> bool {
        self.rdns == other.rdns
    }
}

impl Eq for Dn {}

impl Hash for Dn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rdns.hash(state);
    }
}

impl fmt::Display for Dn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.up_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::NormalizerMapping;

    #[test]
    fn test_root_dn() {
        let dn = Dn::parse("").unwrap();
        assert!(dn.is_empty());
        assert_eq!(dn.norm_name(), "");
        assert_eq!(dn.rdn(), None);
    }

    #[test]
    fn test_offsets() {
        let text = "cn=a,ou=b;o=c";
        let dn = Dn::parse(text).unwrap();
        for rdn in dn.rdns() {
            let start = rdn.start().unwrap();
            assert_eq!(&text[start..start + rdn.length()], rdn.up_name());
        }
        assert_eq!(dn.rdns()[2].start(), Some(10));
    }

    #[test]
    fn test_escaped_and_quoted_separators() {
        let dn = Dn::parse("cn=a\\,b,o=\"x,y;z\"").unwrap();
        assert_eq!(dn.len(), 2);
        assert_eq!(dn.rdns()[0].up_name(), "cn=a\\,b");
        assert_eq!(dn.norm_name(), "cn=a\\,b,o=x\\,y\\;z");
    }

    #[test]
    fn test_errors() {
        assert!(Dn::parse("cn=a,").is_err());
        assert!(Dn::parse(",cn=a").is_err());
        assert!(Dn::parse("cn=\"a,b").is_err());
    }

    #[test]
    fn test_equality_ignores_case_and_spacing() {
        let a = Dn::parse("CN=John , O=Acme").unwrap();
        let b = Dn::parse("cn=john,o=acme").unwrap();
        assert_eq!(a, b);
        assert_ne!(a.up_name(), b.up_name());
        assert_ne!(a, Dn::parse("o=acme,cn=john").unwrap());
    }

    #[test]
    fn test_normalize() {
        let schema = NormalizerMapping::with_core_attributes();
        let dn = Dn::parse("CN=John,DC=Example").unwrap();
        assert!(!dn.is_normalized());
        let dn = dn.normalize(&schema).unwrap();
        assert!(dn.is_normalized());
        assert_eq!(
            dn.norm_name(),
            "2.5.4.3=john,0.9.2342.19200300.100.1.25=example"
        );
        assert_eq!(dn.to_string(), "CN=John,DC=Example");

        let parsed = Dn::parse_with_schema("cn=JOHN, dc=example", &schema).unwrap();
        assert_eq!(parsed, dn);
    }
}
