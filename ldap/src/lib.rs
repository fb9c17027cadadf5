//! ldap-rs - LDAP protocol building blocks
//!
//! This library provides the name model, schema objects and BER codecs of
//! the LDAP protocol.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `ldap-core`: Error type, attribute values and string helpers
//! - `ldap-asn1`: BER primitives and the container-driven PDU decoder
//! - `ldap-model`: AVAs, RDNs, DNs and schema objects
//! - `ldap-codec`: Extended operations and attribute value assertions
//!
//! # Usage
//!
//! ```rust
//! use ldap::{Cancel, Rdn};
//!
//! let cancel = Cancel::decode(&[0x30, 0x03, 0x02, 0x01, 0x01]).unwrap();
//! assert_eq!(cancel.cancel_id(), 1);
//!
//! let rdn: Rdn = "sn=Doe+cn=John".parse().unwrap();
//! assert_eq!(rdn.norm_name(), "cn=john+sn=doe");
//! ```

// Re-export core types
pub use ldap_core::{LdapError, LdapResult, Value};

// Re-export the name model
pub use ldap_model::name::{
    Ava, Dn, Normalization, Rdn, RdnBuilder, escape_value, escape_value_bytes, unescape_value,
};

// Re-export codecs
pub use ldap_codec::{
    AttributeValueAssertion, Cancel, CancelContainer, CancelDecoder, CancelFactory,
    CancelResponse, ExtendedRequestFactory, FilterType, GracefulShutdown,
    GracefulShutdownContainer, GracefulShutdownDecoder, GracefulShutdownFactory,
    GracefulShutdownResponse,
};

/// BER primitives and the generic container decoder
pub mod asn1 {
    pub use ldap_asn1::*;
}

/// Schema objects
pub mod schema {
    pub use ldap_model::schema::*;
}
