//! Name model and schema objects for LDAP
//!
//! This crate provides:
//! - `name`: attribute value assertions (AVAs), relative distinguished names
//!   (RDNs) and distinguished names (DNs), with parsing, escaping and
//!   schema-aware normalization
//! - `schema`: the normalizer seam consulted while normalizing names, syntax
//!   checkers, comparators and the NameForm schema object

pub mod name;
pub mod schema;

pub use name::{Ava, Dn, Normalization, Rdn, RdnBuilder};
pub use schema::{NormalizerMapping, OidNormalizer, SchemaManager};
